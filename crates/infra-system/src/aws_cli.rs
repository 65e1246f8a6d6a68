// aws CLI process runner
// reason: tokio::process for non-blocking children, explicit argv (no shell)
use std::collections::HashMap;
use std::process::{Output, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use queueburst_core::domain::SendTarget;
use queueburst_core::port::{DispatchError, TimeProvider};

/// Default client executable, resolved through PATH
pub const DEFAULT_PROGRAM: &str = "aws";

/// Environment variables passed through to the client
pub const DEFAULT_ENV_ALLOWLIST: &[&str] = &[
    "PATH",
    "HOME",
    "USER",
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "AWS_SESSION_TOKEN",
    "AWS_PROFILE",
    "AWS_DEFAULT_REGION",
    "AWS_CONFIG_FILE",
    "AWS_SHARED_CREDENTIALS_FILE",
    "AWS_CA_BUNDLE",
];

/// Spawns the queue-client CLI with an allowlisted environment
#[derive(Clone)]
pub struct AwsCli {
    program: String,
    env_allowlist: Vec<String>,
    time_provider: Arc<dyn TimeProvider>,
}

impl AwsCli {
    /// Create a runner for the `aws` executable on PATH
    ///
    /// # Example
    /// ```ignore
    /// let cli = AwsCli::new(Arc::new(SystemTimeProvider)).with_program("/opt/aws/bin/aws");
    /// ```
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            env_allowlist: DEFAULT_ENV_ALLOWLIST.iter().map(|s| s.to_string()).collect(),
            time_provider,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_env_allowlist(mut self, env_allowlist: Vec<String>) -> Self {
        self.env_allowlist = env_allowlist;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Leading arguments shared by every sqs call: service, region, endpoint
    pub fn base_args(target: &SendTarget) -> Vec<String> {
        vec![
            "sqs".to_string(),
            "--region".to_string(),
            target.region.clone(),
            "--endpoint-url".to_string(),
            target.endpoint_url.clone(),
        ]
    }

    /// Filter environment variables to allowlist only
    pub(crate) fn filter_env<I>(&self, env: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        env.into_iter()
            .filter(|(k, _)| self.env_allowlist.contains(k))
            .collect()
    }

    fn command(&self, args: &[String]) -> Command {
        let inherited = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));

        let mut command = Command::new(&self.program);
        command
            .args(args)
            .env_clear()
            .envs(self.filter_env(inherited))
            .stdin(Stdio::null());
        command
    }

    /// Run the client to completion, capturing its output
    ///
    /// Returns the output together with the elapsed milliseconds.
    pub async fn run(
        &self,
        args: &[String],
        limit: Option<Duration>,
    ) -> Result<(Output, i64), DispatchError> {
        let start_time = self.time_provider.now_millis();

        let child = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DispatchError::SpawnFailed(format!("{}: {}", self.program, e)))?;

        let output = match limit {
            // Dropping the timed-out future drops the child, which kills it
            Some(limit) => match timeout(limit, child.wait_with_output()).await {
                Ok(Ok(output)) => output,
                Ok(Err(e)) => return Err(DispatchError::IoError(e.to_string())),
                Err(_) => return Err(DispatchError::Timeout(limit.as_millis() as i64)),
            },
            None => child
                .wait_with_output()
                .await
                .map_err(|e| DispatchError::IoError(e.to_string()))?,
        };

        let duration_ms = self.time_provider.now_millis() - start_time;
        debug!(
            program = %self.program,
            exit_code = ?output.status.code(),
            duration_ms = duration_ms,
            "Client exited"
        );

        Ok((output, duration_ms))
    }

    /// Start the client and forget it. Output is discarded.
    pub fn spawn_detached(&self, args: &[String]) -> Result<Option<u32>, DispatchError> {
        let child = self
            .command(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false)
            .spawn()
            .map_err(|e| DispatchError::SpawnFailed(format!("{}: {}", self.program, e)))?;

        Ok(child.id())
    }
}

/// Turn a finished client run into an error when it exited non-zero
pub(crate) fn check_status(output: &Output) -> Result<(), DispatchError> {
    if output.status.success() {
        return Ok(());
    }

    Err(DispatchError::NonZeroExit {
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use queueburst_core::port::time_provider::SystemTimeProvider;

    fn target() -> SendTarget {
        SendTarget {
            region: "eu-central-1".to_string(),
            endpoint_url: "http://127.0.0.1:9324".to_string(),
            queue_url: "http://localhost:9324/queue/orders".to_string(),
            message_body: "come random message".to_string(),
        }
    }

    #[test]
    fn test_base_args() {
        assert_eq!(
            AwsCli::base_args(&target()),
            vec![
                "sqs",
                "--region",
                "eu-central-1",
                "--endpoint-url",
                "http://127.0.0.1:9324"
            ]
        );
    }

    #[test]
    fn test_env_filtering() {
        let cli = AwsCli::new(Arc::new(SystemTimeProvider))
            .with_env_allowlist(vec!["AWS_PROFILE".to_string()]);

        let env = vec![
            ("AWS_PROFILE".to_string(), "local".to_string()),
            ("DATABASE_URL".to_string(), "postgres://secret".to_string()),
        ];

        let filtered = cli.filter_env(env);

        assert_eq!(filtered.len(), 1);
        assert!(filtered.contains_key("AWS_PROFILE"));
        assert!(!filtered.contains_key("DATABASE_URL"));
    }

    #[tokio::test]
    async fn test_run_success() {
        let cli = AwsCli::new(Arc::new(SystemTimeProvider)).with_program("echo");

        let (output, _) = cli.run(&["hello".to_string()], None).await.unwrap();

        assert!(check_status(&output).is_ok());
        assert!(String::from_utf8_lossy(&output.stdout).contains("hello"));
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let cli = AwsCli::new(Arc::new(SystemTimeProvider))
            .with_program("queueburst-no-such-client");

        let result = cli.run(&[], None).await;

        assert!(matches!(result, Err(DispatchError::SpawnFailed(_))));
    }

    #[tokio::test]
    async fn test_run_timeout() {
        let cli = AwsCli::new(Arc::new(SystemTimeProvider)).with_program("sleep");

        let result = cli
            .run(&["10".to_string()], Some(Duration::from_millis(100)))
            .await;

        assert!(matches!(result, Err(DispatchError::Timeout(100))));
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let cli = AwsCli::new(Arc::new(SystemTimeProvider)).with_program("false");

        let (output, _) = cli.run(&[], None).await.unwrap();
        let err = check_status(&output).unwrap_err();

        assert_eq!(err.exit_code(), Some(1));
    }
}
