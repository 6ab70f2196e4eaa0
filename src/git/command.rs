use std::io::Read;

const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(10);

/// Run `cmd` to completion, capturing its output, killing it once `timeout` elapses.
///
/// Output is drained on helper threads so a chatty child can't block on a full pipe.
pub fn run_with_timeout(
    cmd: &mut std::process::Command,
    timeout: std::time::Duration,
) -> std::io::Result<std::process::Output> {
    log::trace!("Running `{}` (timeout {timeout:?})", describe(cmd));
    let spawned = cmd
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn();
    let mut child = spawned.map_err(|err| {
        std::io::Error::new(err.kind(), format!("could not run `{}`: {err}", describe(cmd)))
    })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let start = std::time::Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if timeout <= start.elapsed() {
            let _ = child.kill();
            let _ = child.wait();
            return Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("`{}` did not finish within {timeout:?}", describe(cmd)),
            ));
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    Ok(std::process::Output {
        status,
        stdout: join(stdout)?,
        stderr: join(stderr)?,
    })
}

fn drain<R: Read + Send + 'static>(
    pipe: Option<R>,
) -> Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>> {
    pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buffer = Vec::new();
            pipe.read_to_end(&mut buffer)?;
            Ok(buffer)
        })
    })
}

fn join(
    handle: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
) -> std::io::Result<Vec<u8>> {
    match handle {
        Some(handle) => handle
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("output reader panicked"))),
        None => Ok(Vec::new()),
    }
}

/// Short human description of a command: the program and its first non-flag argument.
pub fn describe(cmd: &std::process::Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let subcommand = cmd
        .get_args()
        .map(std::ffi::OsStr::to_string_lossy)
        .find(|arg| !arg.starts_with('-'));
    match subcommand {
        Some(subcommand) => format!("{program} {subcommand}"),
        None => program.into_owned(),
    }
}
