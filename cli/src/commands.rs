//! Command handlers talking to the daemon's REST API

use crate::formatters::render_status_table;
use procvisor_engine::adapters::rest::handlers::{
    ErrorResponse, ListProcessesResponse, PingResponse, SuccessResponse,
};
use serde::de::DeserializeOwned;
use std::time::Duration;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Blocking HTTP client bound to one daemon address
pub struct Client {
    base_url: String,
    agent: ureq::Agent,
}

impl Client {
    pub fn new(server_addr: &str) -> Self {
        // Stop waits up to 30s for the child, leave room on top of that
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(45))
            .build();
        Self {
            base_url: format!("http://{}", server_addr),
            agent,
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> CliResult<T> {
        let url = format!("{}{}", self.base_url, path);
        self.read(self.agent.get(&url).call(), &url)
    }

    fn post<T: DeserializeOwned>(&self, path: &str) -> CliResult<T> {
        let url = format!("{}{}", self.base_url, path);
        self.read(self.agent.post(&url).call(), &url)
    }

    fn read<T: DeserializeOwned>(
        &self,
        result: Result<ureq::Response, ureq::Error>,
        url: &str,
    ) -> CliResult<T> {
        match result {
            Ok(resp) => Ok(serde_json::from_str(&resp.into_string()?)?),
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                let message = serde_json::from_str::<ErrorResponse>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                Err(format!("{} (HTTP {})", message, code).into())
            }
            Err(e) => Err(format!("did not connect to daemon at {}: {}", url, e).into()),
        }
    }
}

pub fn handle_ping(client: &Client) -> CliResult<()> {
    let resp: PingResponse = client.get("/ping")?;
    println!(
        "Connected to daemon, service version: {}",
        resp.service_version
    );
    Ok(())
}

pub fn handle_status(client: &Client, verbose: bool) -> CliResult<()> {
    let resp: ListProcessesResponse = client.get("/processes")?;
    if resp.processes.is_empty() {
        println!("No processes");
        return Ok(());
    }
    print!("{}", render_status_table(&resp.processes, verbose)?);
    Ok(())
}

/// Control route for `action` on `name`; the name is one encoded path segment
fn action_path(name: &str, action: &str) -> String {
    format!("/processes/{}/{}", urlencoding::encode(name), action)
}

/// Send one action per name, stopping at the first failure
pub fn handle_action(client: &Client, action: &str, names: &[String]) -> CliResult<()> {
    for name in names {
        println!("{} {}", action, name);
        let resp: SuccessResponse = client
            .post(&action_path(name, action))
            .map_err(|e| format!("{} {}: {}", action, name, e))?;
        println!("{}", resp.message);
    }
    Ok(())
}
