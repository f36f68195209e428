#![cfg(all(feature = "std", unix))]

use std::io::Read as _;
use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};

use vboard::cli::{COMMAND_COUNT, Cli, CommandId, Dispatch, Error, Options};
use vboard::sink::fifo::{DEFAULT_FIFO_PATH, FifoSink};
use vboard::sink::{self, Close, MemorySink, Open, write_frame};

fn mkfifo(path: &Path) -> bool {
    Command::new("mkfifo")
        .arg(path)
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[test]
fn test_memory_sink_frames() {
    let mut sink: MemorySink<32> = MemorySink::new();

    let mut stream = sink.open().unwrap();
    write_frame(&mut stream, "one\n").unwrap();
    write_frame(&mut stream, "two\n").unwrap();
    stream.close().unwrap();

    assert_eq!(sink.data(), b"one\n\0two\n\0");
    assert_eq!(sink.frames().collect::<Vec<_>>(), ["one\n", "two\n"]);
    assert_eq!(sink.sessions(), 1);

    sink.clear();
    assert!(sink.data().is_empty());
    assert_eq!(sink.sessions(), 0);
}

#[test]
fn test_memory_sink_overflow() {
    let mut sink: MemorySink<4> = MemorySink::new();
    let mut stream = sink.open().unwrap();

    assert_eq!(write_frame(&mut stream, "12345"), Err(sink::Error::Overflow));
}

#[test]
fn test_fifo_sink_defaults() {
    let sink = FifoSink::default();
    assert_eq!(sink.path(), Some(Path::new(DEFAULT_FIFO_PATH)));
    assert_eq!(sink.timeout(), Duration::from_millis(1000));
}

#[test]
fn test_fifo_sink_empty_path_is_unconfigured() {
    let mut sink = FifoSink::new("", Duration::from_millis(50));
    assert_eq!(sink.path(), None);
    assert_eq!(sink.open().err(), Some(sink::Error::Unconfigured));
}

#[test]
fn test_fifo_sink_set_path_keeps_previous_on_empty() {
    let mut sink = FifoSink::new("/tmp/first", Duration::from_millis(50));

    assert_eq!(sink.set_path(""), Err(sink::Error::Unconfigured));
    assert_eq!(sink.path(), Some(Path::new("/tmp/first")));

    sink.set_path("/tmp/second").unwrap();
    assert_eq!(sink.path(), Some(Path::new("/tmp/second")));
}

#[test]
fn test_fifo_sink_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FifoSink::new(dir.path().join("absent/pipe"), Duration::from_millis(500));

    assert_eq!(sink.open().err(), Some(sink::Error::Open));
}

#[test]
fn test_fifo_sink_writes_regular_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("help.txt");
    std::fs::write(&path, b"").unwrap();

    let mut sink = FifoSink::new(&path, Duration::from_millis(500));
    let mut stream = sink.open().unwrap();
    write_frame(&mut stream, "line\n").unwrap();
    stream.close().unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"line\n\0");
}

fn spawn_reader(path: &Path) -> thread::JoinHandle<Vec<u8>> {
    let path = path.to_path_buf();
    thread::spawn(move || {
        let mut received = Vec::new();
        std::fs::File::open(path)
            .unwrap()
            .read_to_end(&mut received)
            .unwrap();
        received
    })
}

fn frame_count(received: &[u8]) -> usize {
    received.iter().filter(|&&b| b == 0).count()
}

#[test]
fn test_fifo_without_reader_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipe_rx");
    if !mkfifo(&path) {
        return;
    }

    let mut sink = FifoSink::new(&path, Duration::from_millis(100));
    let started = Instant::now();
    assert_eq!(sink.open().err(), Some(sink::Error::Timeout));
    assert!(started.elapsed() >= Duration::from_millis(100));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_help_recovers_after_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipe_rx");
    if !mkfifo(&path) {
        return;
    }

    let options = Options::default()
        .with_fifo_path(path.to_str().unwrap())
        .unwrap()
        .with_sink_timeout(Duration::from_millis(100));
    let mut cli = Cli::from_options(options);
    assert_eq!(
        cli.dispatch("vboard -h"),
        Err(Error::Sink(sink::Error::Timeout))
    );

    let reader = spawn_reader(&path);
    thread::sleep(Duration::from_millis(300));

    cli.sink_mut().set_timeout(Duration::from_secs(5));
    assert_eq!(cli.dispatch("vboard -h"), Ok(Dispatch::Invoked(CommandId::Help)));

    let received = reader.join().unwrap();
    assert_eq!(frame_count(&received), COMMAND_COUNT + 1);
    assert!(received.starts_with(b"Available Commands:\n\0"));
}

#[test]
fn test_repeated_timeouts_leave_no_opener_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipe_rx");
    if !mkfifo(&path) {
        return;
    }

    let mut sink = FifoSink::new(&path, Duration::from_millis(5));
    for _ in 0..20 {
        assert_eq!(sink.open().err(), Some(sink::Error::Timeout));
    }

    // A reader attaching now must not see a writer come and go.
    let reader = spawn_reader(&path);
    thread::sleep(Duration::from_millis(200));
    assert!(!reader.is_finished());

    sink.set_timeout(Duration::from_secs(5));
    let mut stream = sink.open().unwrap();
    write_frame(&mut stream, "late\n").unwrap();
    stream.close().unwrap();

    assert_eq!(reader.join().unwrap(), b"late\n\0");
}

#[test]
fn test_zero_timeout_opens_when_reader_present() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipe_rx");
    if !mkfifo(&path) {
        return;
    }

    let mut sink = FifoSink::new(&path, Duration::ZERO);
    assert_eq!(sink.open().err(), Some(sink::Error::Timeout));

    // Read-write opens of a FIFO never block and count as a reader.
    let mut reader = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(&path)
        .unwrap();

    let mut stream = sink.open().unwrap();
    write_frame(&mut stream, "now\n").unwrap();
    stream.close().unwrap();

    let mut received = [0u8; 5];
    reader.read_exact(&mut received).unwrap();
    assert_eq!(&received, b"now\n\0");
}

#[test]
fn test_help_through_fifo() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipe_rx");
    if !mkfifo(&path) {
        return;
    }

    let reader = spawn_reader(&path);

    let options = Options::default()
        .with_fifo_path(path.to_str().unwrap())
        .unwrap()
        .with_sink_timeout(Duration::from_secs(5));
    let mut cli = Cli::from_options(options);

    assert_eq!(cli.dispatch("vboard -h"), Ok(Dispatch::Invoked(CommandId::Help)));
    drop(cli);

    let received = reader.join().unwrap();
    let frames: Vec<&str> = received
        .split(|&b| b == 0)
        .filter(|frame| !frame.is_empty())
        .map(|frame| std::str::from_utf8(frame).unwrap())
        .collect();

    assert_eq!(frames.len(), COMMAND_COUNT + 1);
    assert_eq!(frames[0], "Available Commands:\n");
    assert!(frames[COMMAND_COUNT].ends_with("help (-h) - Display this help.\n"));
}

#[test]
fn test_set_fifo_stream_updates_options_and_sink() {
    let mut cli = Cli::from_options(Options::default());
    assert_eq!(cli.options().fifo_path.as_str(), DEFAULT_FIFO_PATH);

    cli.set_fifo_stream("/run/vboard/help").unwrap();
    assert_eq!(cli.options().fifo_path.as_str(), "/run/vboard/help");
    assert_eq!(cli.sink().path(), Some(Path::new("/run/vboard/help")));

    assert_eq!(
        cli.set_fifo_stream(""),
        Err(Error::Sink(sink::Error::Unconfigured))
    );
    assert_eq!(cli.options().fifo_path.as_str(), "/run/vboard/help");

    let long = "x".repeat(200);
    assert_eq!(cli.set_fifo_stream(&long), Err(Error::InvalidOptions));
    assert_eq!(cli.sink().path(), Some(Path::new("/run/vboard/help")));
}

#[test]
fn test_unconfigured_fifo_reports_error() {
    let options = Options::default().with_fifo_path("").unwrap();
    let mut cli = Cli::from_options(options);

    assert_eq!(
        cli.dispatch("vboard -h"),
        Err(Error::Sink(sink::Error::Unconfigured))
    );
}
