//! 모니터링 알람 프로브
//!
//! 환경 이름이 들어간 알람을 상태별로 집계합니다. ALARM 상태가 하나라도 있으면
//! Error, 알람이 하나도 없으면 Warning입니다.

use std::sync::Arc;

use stackpulse_core::details::{ActiveAlarm, AlarmDetails};
use stackpulse_core::{CheckResult, ComponentKind, Details, Probe, ProbeError, RunContext};

use crate::cloud::{AlarmState, CloudApi};
use crate::findings::Findings;

pub const NAME: &str = "alarms";

pub struct AlarmsProbe<C> {
    cloud: Arc<C>,
    environment: String,
}

impl<C: CloudApi> AlarmsProbe<C> {
    pub fn new(cloud: Arc<C>, ctx: &RunContext) -> Self {
        Self {
            cloud,
            environment: ctx.environment.clone(),
        }
    }
}

impl<C: CloudApi> Probe for AlarmsProbe<C> {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Alarms
    }

    async fn run(&self) -> Result<CheckResult, ProbeError> {
        let alarms = self.cloud.list_alarms().await?;

        let mut details = AlarmDetails::default();
        for alarm in alarms
            .into_iter()
            .filter(|a| a.name.contains(self.environment.as_str()))
        {
            details.total += 1;
            match alarm.state {
                AlarmState::Ok => details.ok += 1,
                AlarmState::Alarm => {
                    details.alarm += 1;
                    details.active.push(ActiveAlarm {
                        name: alarm.name,
                        reason: alarm.reason.unwrap_or_else(|| "Unknown".to_owned()),
                    });
                }
                AlarmState::InsufficientData => details.insufficient_data += 1,
            }
        }

        let mut findings = Findings::new();
        if details.alarm > 0 {
            let names: Vec<&str> = details.active.iter().map(|a| a.name.as_str()).collect();
            findings.error(format!("{} active alarms: {}", details.alarm, names.join(", ")));
        } else if details.total == 0 {
            findings.warn("no alarms defined");
        }

        let ok_message = if details.insufficient_data > 0 {
            format!(
                "{} alarms OK, {} with insufficient data",
                details.ok, details.insufficient_data
            )
        } else {
            format!("all {} alarms OK", details.total)
        };
        Ok(findings.finish(NAME, ComponentKind::Alarms, ok_message, Details::Alarms(details)))
    }
}
