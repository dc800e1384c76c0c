


/*
    -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=
        CHAIN CLIENT PROCESS ADAPTER
    -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=

    every call spawns a fresh os process, secrets go through
    the stdin pipe line by line and never through argv since
    argv is visible to everyone inside the process listing
*/


use std::process::Stdio;
use std::time::Duration;
use log::{info, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use crate::ChainError;


/// How long to wait after spawning before the child is considered ready
/// to read from its stdin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness{
    FixedDelay(Duration),
    Immediate,
}

impl Default for Readiness{
    fn default() -> Self{
        Readiness::FixedDelay(Duration::from_secs(1))
    }
}

impl Readiness{

    pub async fn wait(&self){
        if let Readiness::FixedDelay(delay) = self{
            tokio::time::sleep(*delay).await;
        }
    }
}


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine{
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine{

    pub fn new(program: impl Into<String>) -> Self{
        Self{ program: program.into(), args: vec![] }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self{
        self.args.push(arg.into());
        self
    }

    /* splits a shell style command on whitespaces, no quoting support */
    pub fn parse(command: &str) -> Option<Self>{
        let mut split = command.split_whitespace();
        let program = split.next()?;
        Some(
            Self{
                program: program.to_string(),
                args: split.map(String::from).collect(),
            }
        )
    }
}

impl std::fmt::Display for CommandLine{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result{
        write!(f, "{}", self.program)?;
        for arg in &self.args{
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessOutput{
    pub status_code: Option<i32>, // None if the child got killed by a signal
    pub stdout: Vec<u8>,
}

impl ProcessOutput{

    pub fn success(&self) -> bool{
        self.status_code == Some(0)
    }

    /* turns a non zero exit into an error */
    pub fn checked(self) -> Result<Self, ChainError>{
        if self.success(){
            Ok(self)
        } else{
            Err(ChainError::ExitStatus(self.status_code))
        }
    }
}


#[derive(Clone, Debug)]
pub struct ProcessAdapter{
    pub readiness: Readiness,
    pub timeout: Duration,
}

impl Default for ProcessAdapter{
    fn default() -> Self{
        Self{
            readiness: Readiness::default(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl ProcessAdapter{

    pub fn new(readiness: Readiness, timeout: Duration) -> Self{
        Self{ readiness, timeout }
    }

    /// Read only mode, nothing is written into the child stdin.
    pub async fn capture_output(&self, command: &CommandLine) -> Result<ProcessOutput, ChainError>{
        self.run_with_input(command, &[]).await
    }

    /// Spawns the command, waits for readiness, feeds every line followed by a
    /// newline then waits for the exit while collecting stdout.
    pub async fn run_with_input(&self, command: &CommandLine, lines: &[String]) -> Result<ProcessOutput, ChainError>{

        info!("➔ 🔗 spawning chain client: {}", command);

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ChainError::Spawn{ program: command.program.clone(), source: e })?;

        let stdin = child.stdin.take().ok_or(ChainError::Pipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(ChainError::Pipe("stdout"))?;

        let exchange = exchange(child, stdin, stdout, lines, self.readiness);

        /* dropping the exchange future drops the child which kills it */
        match tokio::time::timeout(self.timeout, exchange).await{
            Ok(output) => output,
            Err(_) => Err(ChainError::Timeout(self.timeout)),
        }
    }
}

async fn exchange(
    mut child: Child,
    mut stdin: ChildStdin,
    mut stdout: ChildStdout,
    lines: &[String],
    readiness: Readiness,
) -> Result<ProcessOutput, ChainError>{

    /* don't write before the child is ready */
    if !lines.is_empty(){
        readiness.wait().await;
    }

    for line in lines{
        let mut buf = line.clone().into_bytes();
        buf.push(b'\n');
        if let Err(e) = stdin.write_all(&buf).await{
            /* the child may have exited early, its exit status tells the rest */
            if e.kind() == std::io::ErrorKind::BrokenPipe{
                warn!("chain client closed its stdin before all input was written");
                break;
            }
            return Err(ChainError::Io(e));
        }
    }
    drop(stdin); // EOF for the child

    let mut out = Vec::new();
    stdout.read_to_end(&mut out).await?;
    let status = child.wait().await?;

    Ok(
        ProcessOutput{
            status_code: status.code(),
            stdout: out,
        }
    )
}


#[cfg(test)]
mod tests{

    use super::*;

    fn adapter() -> ProcessAdapter{
        ProcessAdapter::new(Readiness::Immediate, Duration::from_secs(5))
    }

    #[test]
    fn parse_splits_on_whitespace(){
        let cmd = CommandLine::parse("gaiacli  query account addr1 -o json").unwrap();
        assert_eq!(cmd.program, "gaiacli");
        assert_eq!(cmd.args, vec!["query", "account", "addr1", "-o", "json"]);
        assert!(CommandLine::parse("   ").is_none());
        assert_eq!(cmd.to_string(), "gaiacli query account addr1 -o json");
    }

    #[tokio::test]
    async fn captures_stdout_in_read_only_mode(){
        let cmd = CommandLine::new("echo").arg("hello");
        let output = adapter().capture_output(&cmd).await.unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, b"hello\n");
    }

    #[tokio::test]
    async fn feeds_lines_through_stdin_after_the_settle_delay(){
        let delay = Duration::from_millis(200);
        let adapter = ProcessAdapter::new(Readiness::FixedDelay(delay), Duration::from_secs(5));
        let cmd = CommandLine::new("cat");
        let started = std::time::Instant::now();
        let output = adapter
            .run_with_input(&cmd, &["passphrase".to_string(), "y".to_string()])
            .await
            .unwrap();
        /* cat only exits on EOF and stdin is closed after the last line */
        assert!(started.elapsed() >= delay, "input was written after {:?}", started.elapsed());
        assert_eq!(output.stdout, b"passphrase\ny\n");
    }

    #[tokio::test]
    async fn read_only_mode_skips_the_settle_delay(){
        let adapter = ProcessAdapter::new(Readiness::FixedDelay(Duration::from_secs(3)), Duration::from_secs(5));
        let started = std::time::Instant::now();
        let output = adapter.capture_output(&CommandLine::new("echo").arg("ok")).await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(output.stdout, b"ok\n");
    }

    #[tokio::test]
    async fn non_zero_exit_is_surfaced(){
        let output = adapter().capture_output(&CommandLine::new("false")).await.unwrap();
        assert!(!output.success());
        assert!(matches!(output.checked(), Err(ChainError::ExitStatus(Some(1)))));
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error(){
        let cmd = CommandLine::new("definitely-not-a-chain-client-binary");
        let err = adapter().capture_output(&cmd).await.unwrap_err();
        assert!(matches!(err, ChainError::Spawn{ .. }));
    }

    #[tokio::test]
    async fn slow_process_times_out(){
        let adapter = ProcessAdapter::new(Readiness::Immediate, Duration::from_millis(100));
        let cmd = CommandLine::new("sleep").arg("5");
        let err = adapter.capture_output(&cmd).await.unwrap_err();
        assert!(matches!(err, ChainError::Timeout(_)));
    }
}
