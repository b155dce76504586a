// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! C7: wake-condition matching. Pure functions over in-memory
//! [`WakeCondition`] values — persistence (append `wake:fire`, pause
//! one-shots) is the caller's job since it also has to decide who to notify.

use agentbus_core::{Event, WakeCondition, WakePersistence, WakeType};

/// Decides whether a `pattern` match is actually interesting enough to wake
/// an agent over. Stands in for the "lightweight classifier" a `pattern`
/// condition may delegate to when `use_router` is set.
pub trait RouterClassifier {
    fn should_fire(&self, condition: &WakeCondition, body: &str) -> bool;
}

/// No classifier wired up yet: every regex match fires.
pub struct AlwaysFireRouter;

impl RouterClassifier for AlwaysFireRouter {
    fn should_fire(&self, _condition: &WakeCondition, _body: &str) -> bool {
        true
    }
}

/// Which armed, unspent conditions fire in response to `event`.
pub fn conditions_fired_by<'a>(
    conditions: &'a [WakeCondition],
    event: &Event,
) -> Vec<&'a WakeCondition> {
    conditions
        .iter()
        .filter(|c| c.is_armed() && !c.is_spent())
        .filter(|c| matches_message_event(c, event))
        .collect()
}

fn matches_message_event(condition: &WakeCondition, event: &Event) -> bool {
    let Event::MessagePost {
        home,
        body,
        from_agent,
        ..
    } = event
    else {
        return false;
    };
    if let Some(want_home) = &condition.home {
        if want_home != home {
            return false;
        }
    }
    // on_mention(agents, in_thread?): an empty list matches any author, a
    // non-empty one restricts NextMessage/Pattern to those authors.
    if !condition.on_agents.is_empty() && !condition.on_agents.iter().any(|a| a == from_agent.as_str()) {
        return false;
    }
    match condition.wake_type {
        WakeType::NextMessage => true,
        WakeType::Pattern => condition
            .pattern
            .as_deref()
            .and_then(|p| regex::Regex::new(p).ok())
            .map(|re| re.is_match(body))
            .unwrap_or(false),
        WakeType::Timer => false,
    }
}

/// Which armed, unspent timer conditions are due at `now`.
pub fn timers_due<'a>(conditions: &'a [WakeCondition], now: u64) -> Vec<&'a WakeCondition> {
    conditions
        .iter()
        .filter(|c| c.is_armed() && !c.is_spent())
        .filter(|c| c.wake_type == WakeType::Timer)
        .filter(|c| c.fire_at.is_some_and(|fire_at| fire_at <= now))
        .collect()
}

pub fn persists_after_firing(persistence: WakePersistence) -> bool {
    persistence == WakePersistence::Recurring
}

#[cfg(test)]
#[path = "wake_tests.rs"]
mod tests;
