use super::*;
use agentbus_core::AgentId;
use tempfile::tempdir;

fn request(agent: &str, command: &str, dir: &std::path::Path) -> SpawnRequest {
    SpawnRequest {
        agent_id: AgentId::new(agent),
        command: command.to_string(),
        cwd: dir.to_path_buf(),
        env: vec![],
        prompt: "hello".to_string(),
        log_path: dir.join(format!("{agent}.log")),
    }
}

#[tokio::test]
async fn spawn_reports_a_live_pid_and_is_running() {
    let dir = tempdir().unwrap();
    let driver = ProcessDriver::new();
    let handle = driver
        .spawn(request("alice", "sleep 5", dir.path()))
        .await
        .unwrap();
    assert!(handle.pid > 0);
    assert!(driver.is_running(&AgentId::new("alice")).await);
    driver.kill(&AgentId::new("alice")).await.unwrap();
}

#[tokio::test]
async fn kill_stops_the_process() {
    let dir = tempdir().unwrap();
    let driver = ProcessDriver::new();
    driver
        .spawn(request("bob", "sleep 5", dir.path()))
        .await
        .unwrap();
    driver.kill(&AgentId::new("bob")).await.unwrap();
    assert!(!driver.is_running(&AgentId::new("bob")).await);
}

#[tokio::test]
async fn signal_unknown_agent_errors() {
    let driver = ProcessDriver::new();
    let result = driver.signal(&AgentId::new("ghost"), "hi").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn empty_command_fails_to_spawn() {
    let dir = tempdir().unwrap();
    let driver = ProcessDriver::new();
    let result = driver.spawn(request("carol", "   ", dir.path())).await;
    assert!(result.is_err());
}
