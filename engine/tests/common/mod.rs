//! Shared helpers for the engine integration tests
//!
//! Each daemon test gets its own `procvisord` on a free local port and its
//! own configuration file; the `DaemonGuard` terminates the daemon when it
//! goes out of scope, even if the test panics.

#![allow(dead_code)]

use std::io::Write;
use std::net::TcpListener;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

/// Write a supervisor configuration to a temporary file
pub fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("create config file");
    file.write_all(contents.as_bytes()).expect("write config");
    file.flush().expect("flush config");
    file
}

/// Reserve a free TCP port on localhost
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

/// Poll `check` every 100ms until it returns true or `timeout` elapses
pub fn wait_until(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        thread::sleep(Duration::from_millis(100));
    }
    check()
}

/// Running daemon; sends SIGKILL on drop unless already reaped
#[must_use = "DaemonGuard must be held for the duration of the test"]
pub struct DaemonGuard {
    child: Option<Child>,
    port: u16,
    _config: NamedTempFile,
}

impl DaemonGuard {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn pid(&self) -> u32 {
        self.child.as_ref().map(|c| c.id()).unwrap_or(0)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    /// GET a JSON endpoint
    pub fn get_json(&self, path: &str) -> serde_json::Value {
        let body = ureq::get(&self.url(path))
            .call()
            .expect("GET request")
            .into_string()
            .expect("read body");
        serde_json::from_str(&body).expect("JSON body")
    }

    /// POST a control action, returning the HTTP status and JSON body
    pub fn post_action(&self, name: &str, action: &str) -> (u16, serde_json::Value) {
        let url = self.url(&format!("/processes/{}/{}", name, action));
        let resp = match ureq::post(&url).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(e) => panic!("POST {} failed: {}", url, e),
        };
        let status = resp.status();
        let body = resp.into_string().expect("read body");
        (status, serde_json::from_str(&body).expect("JSON body"))
    }

    /// Snapshot of one process from `GET /processes`
    pub fn process(&self, name: &str) -> serde_json::Value {
        let list = self.get_json("/processes");
        list["processes"]
            .as_array()
            .expect("processes array")
            .iter()
            .find(|p| p["spec"]["process_name"] == name)
            .cloned()
            .unwrap_or_else(|| panic!("process {} not listed", name))
    }

    pub fn state(&self, name: &str) -> String {
        self.process(name)["status"]["state"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }

    pub fn wait_for_state(&self, name: &str, state: &str, timeout: Duration) -> bool {
        wait_until(timeout, || self.state(name) == state)
    }

    /// Send SIGTERM and wait for the daemon to exit
    pub fn terminate(&mut self, timeout: Duration) -> Option<ExitStatus> {
        let mut child = self.child.take()?;
        unsafe {
            libc::kill(child.id() as libc::pid_t, libc::SIGTERM);
        }
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(Some(status)) = child.try_wait() {
                return Some(status);
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
            thread::sleep(Duration::from_millis(50));
        }
    }
}

impl Drop for DaemonGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Start `procvisord` with `config` (its `rpc_addr` is overridden with a
/// free port) and wait until `/ping` answers
pub fn setup_daemon(config: &str) -> DaemonGuard {
    let port = free_port();
    let config = write_config(config);

    let child = Command::new(env!("CARGO_BIN_EXE_procvisord"))
        .arg(config.path())
        .env("PROCVISOR_RPC_ADDR", format!("127.0.0.1:{}", port))
        .env("PROCVISOR_LOG_LEVEL", "debug")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("spawn procvisord");

    let guard = DaemonGuard {
        child: Some(child),
        port,
        _config: config,
    };

    let ping = guard.url("/ping");
    assert!(
        wait_until(Duration::from_secs(10), || ureq::get(&ping).call().is_ok()),
        "daemon did not come up on port {}",
        port
    );
    guard
}

/// Whether a process with this pid still exists
pub fn pid_alive(pid: u32) -> bool {
    unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
}
