use anyhow::Result;
use homebox::test_support::{MockCompose, MockContainerState, MockInspector};
use homebox::{Config, ServiceManager, ServiceStatus, StatusSource};
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn write_homelab_config(dir: &Path) -> Result<Config> {
    fs::write(
        dir.join("redis.yml"),
        "services:\n  redis:\n    image: redis:alpine\n",
    )?;
    fs::write(
        dir.join("nginx.yml"),
        "services:\n  nginx:\n    image: nginx:alpine\n",
    )?;

    let config_path = dir.join("config.json");
    fs::write(
        &config_path,
        r#"{
          "services": [
            {"name": "redis", "enabled": true, "compose_file": "redis.yml"},
            {"name": "nginx", "enabled": true, "compose_file": "nginx.yml"}
          ]
        }"#,
    )?;

    Config::load(&config_path)
}

#[test]
fn test_workflow_start_all_status_stop_all() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let config = write_homelab_config(temp_dir.path())?;

    let mock = Arc::new(MockCompose::new());
    let manager = ServiceManager::with_runtime(config, mock.clone(), StatusSource::ComposePs);

    // sobe tudo na ordem da configuração
    manager.start_all_services()?;
    assert_eq!(
        mock.get_commands(),
        vec!["up:redis".to_string(), "up:nginx".to_string()]
    );
    assert!(mock.is_running("redis"));
    assert!(mock.is_running("nginx"));

    let statuses = manager.all_services_status();
    assert_eq!(
        statuses,
        vec![
            ("redis".to_string(), ServiceStatus::Running),
            ("nginx".to_string(), ServiceStatus::Running),
        ]
    );

    // derruba em ordem reversa
    manager.stop_all_services()?;
    let commands = mock.get_commands();
    let stops: Vec<_> = commands
        .iter()
        .filter(|cmd| cmd.starts_with("down:"))
        .cloned()
        .collect();
    assert_eq!(stops, vec!["down:nginx".to_string(), "down:redis".to_string()]);

    let statuses = manager.all_services_status();
    assert_eq!(
        statuses,
        vec![
            ("redis".to_string(), ServiceStatus::Stopped),
            ("nginx".to_string(), ServiceStatus::Stopped),
        ]
    );

    Ok(())
}

#[test]
fn test_workflow_single_service_start_stop() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let config = write_homelab_config(temp_dir.path())?;

    let mock = Arc::new(MockCompose::new());
    let manager = ServiceManager::with_runtime(config, mock.clone(), StatusSource::ComposePs);

    manager.start_service("redis")?;
    assert_eq!(manager.service_status("redis"), ServiceStatus::Running);
    assert_eq!(manager.service_status("nginx"), ServiceStatus::Stopped);

    manager.stop_service("redis")?;
    assert_eq!(manager.service_status("redis"), ServiceStatus::Stopped);

    assert_eq!(
        mock.get_commands()
            .iter()
            .filter(|cmd| !cmd.starts_with("ps"))
            .cloned()
            .collect::<Vec<_>>(),
        vec!["up:redis".to_string(), "down:redis".to_string()]
    );

    Ok(())
}

#[test]
fn test_workflow_status_with_runtime_inspection() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let config = write_homelab_config(temp_dir.path())?;

    let mock = Arc::new(MockCompose::new());
    let inspector = Arc::new(MockInspector::new());
    let manager = ServiceManager::with_runtime(
        config,
        mock.clone(),
        StatusSource::Inspector(inspector.clone()),
    );

    inspector.add_container("redis", MockContainerState::Running);
    inspector.set_healthy("redis");
    inspector.add_container("nginx", MockContainerState::Stopped);

    let statuses = manager.all_services_status();
    assert_eq!(
        statuses,
        vec![
            ("redis".to_string(), ServiceStatus::RunningHealthy),
            ("nginx".to_string(), ServiceStatus::Stopped),
        ]
    );

    // formato exibido pela CLI
    assert_eq!(statuses[0].1.to_string(), "Running (Healthy)");
    assert_eq!(statuses[1].1.to_string(), "Stopped");

    Ok(())
}
