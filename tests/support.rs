use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a function endpoint stand-in that answers every request with
/// `status`.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_function_server(status: u16) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    thread::spawn(move || handle_client(stream, status));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}/fn", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

fn handle_client(mut stream: TcpStream, status: u16) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let mut request = Vec::new();
    let mut buffer = [0u8; 1024];
    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut buffer) {
            Ok(0) | Err(_) => return,
            Ok(read) => request.extend_from_slice(buffer.get(..read).unwrap_or_default()),
        }
    }
    let response = format!(
        "HTTP/1.1 {} Test\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK",
        status
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Writes a one-endpoint `nohup`/`eu` config pointing at `url`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_endpoint_config(dir: &Path, url: &str) -> Result<String, String> {
    let path = dir.join("endpoints.json");
    let content = format!("{{\"nohup\": {{\"eu\": \"{}\"}}}}", url);
    std::fs::write(&path, content).map_err(|err| format!("write config failed: {}", err))?;
    Ok(path.to_string_lossy().into_owned())
}

/// Run the `faasbench` binary and capture output.
///
/// `token` is exported as `SKA_TOKEN`; `None` removes it from the child
/// environment.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_faasbench<I, S>(args: I, token: Option<&str>) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = faasbench_bin()?;
    let mut command = Command::new(bin);
    command
        .args(args)
        .env("FAASBENCH_LOG", "error")
        .env("RUST_LOG", "error");
    match token {
        Some(token) => command.env("SKA_TOKEN", token),
        None => command.env_remove("SKA_TOKEN"),
    };
    command
        .output()
        .map_err(|err| format!("run faasbench failed: {}", err))
}

/// Fails with both output streams attached when the process failed.
///
/// # Errors
///
/// Returns an error if the process exited unsuccessfully.
pub fn expect_success(output: &Output) -> Result<(), String> {
    if output.status.success() {
        return Ok(());
    }
    Err(format!(
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    ))
}

fn faasbench_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_faasbench").map_or_else(
        || Err("CARGO_BIN_EXE_faasbench missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
