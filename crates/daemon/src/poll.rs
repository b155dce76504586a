// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! C8: the poll loop. One tick expires timers, scans new messages for
//! mentions and interrupt directives, drives the presence state machine,
//! and issues driver spawns/signals.

use std::collections::HashMap;
use std::sync::Arc;

use agentbus_adapters::{Driver, SpawnRequest};
use agentbus_core::{AgentId, Clock, Event, Presence};
use agentbus_engine::wake as wake_engine;
use agentbus_storage::{EventLog, Projection};

use crate::config::Config;
use crate::cooldown::Cooldowns;
use crate::error::DaemonError;
use crate::interrupt::{self, InterruptKind};
use crate::wake_state;

/// What a tick decided to do, surfaced for logging and tests.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub spawned: Vec<AgentId>,
    pub signaled: Vec<AgentId>,
    pub demoted_idle: Vec<AgentId>,
}

pub struct PollLoop<D: Driver> {
    config: Config,
    log: EventLog,
    projection: Projection,
    clock: Arc<dyn Clock>,
    driver: D,
    cooldowns: Cooldowns,
    /// Exclusive upper bound of event timestamps already scanned for
    /// mentions/interrupts.
    cursor: u64,
    /// Per-agent resumable session id, cleared by a fresh-session interrupt.
    last_session_id: HashMap<AgentId, String>,
}

impl<D: Driver> PollLoop<D> {
    pub fn new(config: Config, log: EventLog, projection: Projection, clock: Arc<dyn Clock>, driver: D) -> Self {
        Self {
            config,
            log,
            projection,
            clock,
            driver,
            cooldowns: Cooldowns::new(),
            cursor: 0,
            last_session_id: HashMap::new(),
        }
    }

    /// Run a single poll tick.
    pub async fn tick(&mut self) -> Result<TickReport, DaemonError> {
        let mut report = TickReport::default();
        let now = self.clock.now_secs();

        self.reap_exited_agents(now).await?;
        self.demote_idle_agents(now, &mut report)?;
        self.fire_due_timers(now, &mut report).await?;
        self.scan_new_messages(now, &mut report).await?;

        Ok(report)
    }

    /// Detect agents whose driver process has exited on its own (clean
    /// exit) and move them to `offline`, starting the respawn cooldown.
    /// The `Driver` contract doesn't surface exit codes, so every
    /// self-terminated process is treated as a clean exit here.
    async fn reap_exited_agents(&mut self, now: u64) -> Result<(), DaemonError> {
        for agent_id in self.managed_agent_ids()? {
            let presence = self.presence_of(&agent_id)?.unwrap_or(Presence::Offline);
            if !matches!(presence, Presence::Active | Presence::Brb) {
                continue;
            }
            if !self.driver.is_running(&agent_id).await {
                self.transition(&agent_id, presence, Presence::Offline, now, Some("exited".to_string()))?;
                self.cooldowns.start(agent_id, now, self.config.cooldown_secs);
            }
        }
        Ok(())
    }

    fn managed_agent_ids(&self) -> Result<Vec<AgentId>, DaemonError> {
        let mut stmt = self
            .projection
            .conn()
            .prepare("SELECT agent_id FROM agents WHERE managed = 1")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .filter_map(|r| r.ok())
            .map(AgentId::new)
            .collect();
        Ok(ids)
    }

    fn presence_of(&self, agent_id: &AgentId) -> Result<Option<Presence>, DaemonError> {
        let presence: Option<String> = self
            .projection
            .conn()
            .query_row(
                "SELECT presence FROM agents WHERE agent_id = ?1",
                [agent_id.as_str()],
                |row| row.get(0),
            )
            .ok();
        Ok(presence.map(|p| parse_presence(&p)))
    }

    fn last_seen_of(&self, agent_id: &AgentId) -> Result<Option<u64>, DaemonError> {
        let last_seen: Option<i64> = self
            .projection
            .conn()
            .query_row(
                "SELECT last_seen FROM agents WHERE agent_id = ?1",
                [agent_id.as_str()],
                |row| row.get(0),
            )
            .ok();
        Ok(last_seen.map(|v| v as u64))
    }

    fn demote_idle_agents(&mut self, now: u64, report: &mut TickReport) -> Result<(), DaemonError> {
        for agent_id in self.managed_agent_ids()? {
            let Some(Presence::Active) = self.presence_of(&agent_id)? else {
                continue;
            };
            let Some(last_seen) = self.last_seen_of(&agent_id)? else {
                continue;
            };
            if now.saturating_sub(last_seen) > self.config.stale_after_secs {
                self.transition(&agent_id, Presence::Active, Presence::Idle, now, None)?;
                report.demoted_idle.push(agent_id);
            }
        }
        Ok(())
    }

    async fn fire_due_timers(&mut self, now: u64, report: &mut TickReport) -> Result<(), DaemonError> {
        let events = self.log.read_all_sorted()?;
        let conditions = wake_state::fold(&events);
        let due: Vec<_> = wake_engine::timers_due(&conditions, now)
            .into_iter()
            .cloned()
            .collect();

        for condition in due {
            self.log.append(&Event::WakeFire {
                id: condition.id.clone(),
                at: now,
            })?;
            let agent_id = AgentId::new(condition.agent.clone());
            self.wake_agent(&agent_id, "timer fired".to_string(), false, now, report)
                .await?;
        }
        Ok(())
    }

    async fn scan_new_messages(&mut self, now: u64, report: &mut TickReport) -> Result<(), DaemonError> {
        let events = self.log.read_all_sorted()?;
        let managed = self.managed_agent_ids()?;
        let new_events: Vec<Event> = events.into_iter().filter(|e| e.at() > self.cursor).collect();

        for event in &new_events {
            let Event::MessagePost { body, mentions, .. } = event else {
                continue;
            };

            let interrupts = interrupt::parse(body);
            let interrupted: Vec<String> = interrupts.iter().map(|i| i.agent.clone()).collect();
            for interrupt in &interrupts {
                if !managed.iter().any(|a| a.as_str() == interrupt.agent) {
                    continue;
                }
                self.apply_interrupt(interrupt, now, report).await?;
            }

            for mentioned in mentions {
                if interrupted.iter().any(|a| a == mentioned) {
                    continue; // already handled as an interrupt directive
                }
                if !managed.iter().any(|a| a.as_str() == mentioned) {
                    continue;
                }
                let agent_id = AgentId::new(mentioned.clone());
                if self.cooldowns.is_active(&agent_id, now) {
                    continue;
                }
                self.wake_agent(&agent_id, body.clone(), false, now, report).await?;
            }
        }

        if let Some(max_at) = new_events.iter().map(|e| e.at()).max() {
            self.cursor = max_at;
        }
        Ok(())
    }

    async fn apply_interrupt(
        &mut self,
        interrupt: &interrupt::Interrupt,
        now: u64,
        report: &mut TickReport,
    ) -> Result<(), DaemonError> {
        let agent_id = AgentId::new(interrupt.agent.clone());
        self.cooldowns.clear(&agent_id); // interrupts bypass cooldown

        if interrupt.kind.starts_fresh() {
            self.last_session_id.remove(&agent_id);
        }

        if self.driver.is_running(&agent_id).await {
            let _ = self
                .driver
                .signal(&agent_id, &format!("interrupt: {:?}", interrupt.kind))
                .await;
            report.signaled.push(agent_id.clone());
            if matches!(
                interrupt.kind,
                InterruptKind::ResumeNoRespawn | InterruptKind::ForceEnd
            ) {
                let _ = self.driver.kill(&agent_id).await;
            }
            return Ok(());
        }

        if interrupt.kind.respawns() {
            self.wake_agent(&agent_id, "interrupted".to_string(), true, now, report)
                .await?;
        }
        Ok(())
    }

    /// Transition `agent_id` toward `spawning` (if currently eligible) and
    /// issue a spawn request; records a `trigger_event`.
    async fn wake_agent(
        &mut self,
        agent_id: &AgentId,
        prompt: String,
        is_interrupt: bool,
        now: u64,
        report: &mut TickReport,
    ) -> Result<(), DaemonError> {
        if !is_interrupt && self.cooldowns.is_active(agent_id, now) {
            return Ok(());
        }

        let current = self.presence_of(agent_id)?.unwrap_or(Presence::Offline);
        if !current.can_transition_to(Presence::Spawning) {
            return Ok(());
        }
        self.transition(agent_id, current, Presence::Spawning, now, None)?;

        let mut env = vec![("AGENT_ID".to_string(), agent_id.as_str().to_string())];
        if let Some(session_id) = self.last_session_id.get(agent_id) {
            env.push(("AGENTBUS_RESUME_SESSION_ID".to_string(), session_id.clone()));
        }

        let request = SpawnRequest {
            agent_id: agent_id.clone(),
            command: self.config.driver_command.clone(),
            cwd: self.config.project_root.clone(),
            env,
            prompt,
            log_path: self.config.state_dir.join(format!("{}.log", agent_id.as_str())),
        };

        match self.driver.spawn(request).await {
            Ok(_handle) => {
                self.transition(agent_id, Presence::Spawning, Presence::Active, now, None)?;
                report.spawned.push(agent_id.clone());
            }
            Err(_) => {
                self.transition(agent_id, Presence::Spawning, Presence::Error, now, None)?;
            }
        }
        Ok(())
    }

    fn transition(
        &mut self,
        agent_id: &AgentId,
        from: Presence,
        to: Presence,
        at: u64,
        reason: Option<String>,
    ) -> Result<(), DaemonError> {
        let event = Event::AgentPresence {
            agent_id: agent_id.clone(),
            from,
            to,
            at,
            reason,
        };
        self.log.append(&event)?;
        self.projection.apply(&event)?;
        Ok(())
    }
}

fn parse_presence(s: &str) -> Presence {
    match s {
        "spawning" => Presence::Spawning,
        "active" => Presence::Active,
        "idle" => Presence::Idle,
        "brb" => Presence::Brb,
        "error" => Presence::Error,
        _ => Presence::Offline,
    }
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
