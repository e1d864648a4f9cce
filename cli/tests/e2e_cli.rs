//! End-to-end tests running `procvisorctl` against an in-process control server

use procvisor_engine::adapters::rest::{build_router, serve_on_tcp};
use procvisor_engine::infrastructure::{parse_config, TokioProcessExecutor};
use procvisor_engine::{ControlService, ProcessRegistry};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::process::{Command, Output};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

const CONFIG: &str = r#"
version: v0.1
processes:
  - process_name: sleeper
    command: sleep 60
    start_seconds: 1
    description: long running sleeper
  - process_name: idle
    command: sleep 60
    directory: /tmp
    environment:
      - MODE=idle
    autostart: false
"#;

/// Control server on a free port; stops the supervised processes on drop
struct ServerGuard {
    runtime: Runtime,
    registry: Arc<ProcessRegistry>,
    addr: SocketAddr,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        self.runtime.block_on(self.registry.shutdown_all());
    }
}

fn setup_server() -> ServerGuard {
    let addr = TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .expect("reserve port");

    let runtime = Runtime::new().expect("tokio runtime");
    let config = parse_config(CONFIG).expect("valid config");
    let registry = Arc::new(
        ProcessRegistry::load(&config, Arc::new(TokioProcessExecutor::new())).expect("registry"),
    );

    runtime.block_on(registry.start_all());
    let app = build_router(ControlService::new(registry.clone()));
    runtime.spawn(async move {
        let _ = serve_on_tcp(addr, app, std::future::pending()).await;
    });

    let deadline = Instant::now() + Duration::from_secs(5);
    while TcpStream::connect(addr).is_err() {
        assert!(Instant::now() < deadline, "server did not come up");
        thread::sleep(Duration::from_millis(50));
    }

    ServerGuard {
        runtime,
        registry,
        addr,
    }
}

fn run_cli(server: &ServerGuard, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_procvisorctl"))
        .arg("-s")
        .arg(server.addr.to_string())
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("run procvisorctl")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Wait until the status row for `name` shows `state`
fn wait_for_status(server: &ServerGuard, name: &str, state: &str) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        let out = stdout(&run_cli(server, &["status"]));
        if out
            .lines()
            .any(|line| line.starts_with(name) && line.contains(state))
        {
            return true;
        }
        thread::sleep(Duration::from_millis(200));
    }
    false
}

#[test]
fn test_cli_ping() {
    let server = setup_server();
    let output = run_cli(&server, &["ping"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("service version: v0.1"));
}

#[test]
fn test_cli_status_table() {
    let server = setup_server();
    assert!(wait_for_status(&server, "sleeper", "RUNNING"));

    let output = run_cli(&server, &["status"]);
    assert!(output.status.success());
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("NAME"));
    assert!(lines[1].starts_with("sleeper"));
    assert!(lines[1].contains("long running sleeper"));
    assert!(lines[2].starts_with("idle"));
    assert!(lines[2].contains("STOPPED"));
    assert!(!out.contains("ENVIRONMENT"));

    let verbose = stdout(&run_cli(&server, &["status", "-v"]));
    assert!(verbose.contains("ENVIRONMENT"));
    assert!(verbose.contains("MODE=idle"));
    assert!(verbose.contains("/tmp"));
}

#[test]
fn test_cli_start_stop_several_names() {
    let server = setup_server();

    let output = run_cli(&server, &["start", "idle"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("start idle: ok"));
    assert!(wait_for_status(&server, "idle", "RUNNING"));

    let output = run_cli(&server, &["stop", "sleeper", "idle"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("stop sleeper: ok"));
    assert!(out.contains("stop idle: ok"));
}

#[test]
fn test_cli_reports_errors() {
    let server = setup_server();

    let output = run_cli(&server, &["kill", "ghost"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("ghost"));
    assert!(err.contains("404"));

    // Second name is not attempted after a failure
    let output = run_cli(&server, &["stop", "idle", "sleeper"]);
    assert!(!output.status.success());
    assert!(!stdout(&output).contains("stop sleeper"));
}

#[test]
fn test_cli_daemon_unreachable() {
    let port = TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .expect("reserve port")
        .port();
    let output = Command::new(env!("CARGO_BIN_EXE_procvisorctl"))
        .args(["-s", &format!("127.0.0.1:{}", port), "ping"])
        .output()
        .expect("run procvisorctl");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("did not connect"));
}
