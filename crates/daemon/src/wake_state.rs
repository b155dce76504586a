// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Wake conditions are never projected into C2 (they're read straight off
//! the log by the engine); the daemon folds `wake:*` events into an
//! in-memory table once per poll tick the same way pruning folds message
//! events into a required-id set.

use std::collections::HashMap;

use agentbus_core::{Event, WakeCondition, WakeId};

/// Replay `wake:set`/`wake:fire`/`wake:pause`/`wake:clear` events into the
/// current set of live wake conditions, in event order.
pub fn fold(events: &[Event]) -> Vec<WakeCondition> {
    let mut table: HashMap<WakeId, WakeCondition> = HashMap::new();

    for event in events {
        match event {
            Event::WakeSet {
                id,
                agent_id,
                wake_type,
                persistence,
                home,
                pattern,
                fire_at,
                on_agents,
                at,
            } => {
                table.insert(
                    id.clone(),
                    WakeCondition {
                        id: id.clone(),
                        agent: agent_id.as_str().to_string(),
                        wake_type: *wake_type,
                        persistence: *persistence,
                        home: home.clone(),
                        pattern: pattern.clone(),
                        fire_at: *fire_at,
                        on_agents: on_agents.clone(),
                        created_at: *at,
                        paused: false,
                        last_fired_at: None,
                    },
                );
            }
            Event::WakeFire { id, at } => {
                if let Some(condition) = table.get_mut(id) {
                    condition.mark_fired(*at);
                }
            }
            Event::WakePause { id, .. } => {
                if let Some(condition) = table.get_mut(id) {
                    condition.paused = true;
                }
            }
            Event::WakeClear { id, .. } => {
                table.remove(id);
            }
            _ => {}
        }
    }

    table.into_values().collect()
}

#[cfg(test)]
#[path = "wake_state_tests.rs"]
mod tests;
