//! 프로브 내부 판정 누적기
//!
//! 프로브는 검사 중 발견한 문제를 [`Findings`]에 기록하고 마지막에 하나의
//! [`CheckResult`]로 접습니다. 가장 심각한 레벨이 결과의 심각도가 되고,
//! 메시지는 그 레벨의 발견 사항만 `"; "`로 이어 붙인 문자열입니다.

use stackpulse_core::{CheckResult, ComponentKind, Details, Severity};

/// 발견 사항 누적기
#[derive(Debug, Clone, Default)]
pub struct Findings {
    notes: Vec<(Severity, String)>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    /// 경고 사항을 기록합니다.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.notes.push((Severity::Warning, message.into()));
    }

    /// 오류 사항을 기록합니다.
    pub fn error(&mut self, message: impl Into<String>) {
        self.notes.push((Severity::Error, message.into()));
    }

    /// 지금까지 기록된 가장 심각한 레벨. 없으면 `Ok`입니다.
    pub fn severity(&self) -> Severity {
        Severity::worst(self.notes.iter().map(|(s, _)| *s))
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// 가장 심각한 레벨의 메시지를 이어 붙입니다.
    pub fn message(&self) -> Option<String> {
        let worst = self.severity();
        let parts: Vec<&str> = self
            .notes
            .iter()
            .filter(|(s, _)| *s == worst)
            .map(|(_, m)| m.as_str())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }

    /// 결과로 접습니다. 발견 사항이 없으면 `ok_message`를 쓰는 `Ok` 결과입니다.
    pub fn finish(
        self,
        component: &str,
        kind: ComponentKind,
        ok_message: impl Into<String>,
        details: Details,
    ) -> CheckResult {
        let severity = self.severity();
        let message = self.message().unwrap_or_else(|| ok_message.into());
        CheckResult::new(component, kind, severity, message).with_details(details)
    }
}
