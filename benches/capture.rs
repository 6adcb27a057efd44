//! Performance benchmarks for the capture pipeline.
//!
//! Compares hand-written argument parsing against a derived capture of the
//! same record, and measures scripted prompting and container arguments.

use criterion::{criterion_group, criterion_main, Criterion};
use argprompt::{capture, take_arg, Capture, MockEnv, MockTerminal, Options};
use std::hint::black_box;

// =============================================================================
// Manual Parsing (Baseline)
// =============================================================================

mod manual {
    use super::*;

    #[allow(dead_code)]
    #[derive(Debug, Default)]
    pub struct Server {
        pub host: String,
        pub port: u16,
        pub workers: u8,
        pub log_level: String,
        pub verbose: bool,
    }

    impl Server {
        pub fn parse(mut args: Vec<String>) -> Result<Self, String> {
            let host = take_arg("host", "localhost", &mut args, "--", false);
            let port = take_arg("port", "8080", &mut args, "--", false)
                .parse()
                .map_err(|_| "port must be a number".to_string())?;
            let workers = take_arg("workers", "4", &mut args, "--", false)
                .parse()
                .map_err(|_| "workers must be a number".to_string())?;
            if workers == 0 || workers > 64 {
                return Err("workers must be between 1 and 64".to_string());
            }
            let log_level = take_arg("log-level", "info", &mut args, "--", false);
            let verbose = take_arg("verbose", "false", &mut args, "--", true) == "true";
            Ok(Self {
                host,
                port,
                workers,
                log_level,
                verbose,
            })
        }
    }
}

// =============================================================================
// Derived Capture
// =============================================================================

#[allow(dead_code)]
#[derive(Debug, Default, Capture)]
struct Server {
    #[capture(default = "localhost")]
    host: String,
    #[capture(default = "8080")]
    port: u16,
    #[capture(default = "4", min = 1, max = 64)]
    workers: u8,
    #[capture(default = "info", options = "trace,debug,info,warn,error")]
    log_level: String,
    verbose: bool,
}

#[allow(dead_code)]
#[derive(Debug, Default, Capture)]
struct Fleet {
    servers: Vec<Server>,
    labels: Vec<String>,
}

fn server_args() -> Vec<String> {
    [
        "--host", "example.com", "--port", "9000", "--workers", "8", "--log-level", "warn",
        "--verbose",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn fleet_args() -> Vec<String> {
    let mut args = Vec::new();
    for i in 1..=10 {
        args.push(format!("--servers-{}-host", i));
        args.push(format!("node{}", i));
        args.push("--labels".to_string());
        args.push(format!("label{}", i));
    }
    args
}

fn bench_manual_parsing(c: &mut Criterion) {
    let args = server_args();

    c.bench_function("manual_parsing", |b| {
        b.iter(|| {
            let server = manual::Server::parse(black_box(args.clone()));
            black_box(server.unwrap())
        })
    });
}

fn bench_derived_capture(c: &mut Criterion) {
    let args = server_args();

    c.bench_function("derived_capture", |b| {
        b.iter(|| {
            let mut opts = Options::new()
                .with_args(black_box(args.clone()))
                .with_env(MockEnv::new());
            let mut server = Server::default();
            capture(&mut opts, &mut server).unwrap();
            black_box(server)
        })
    });
}

fn bench_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("argument_parsing_comparison");
    let args = server_args();

    group.bench_function("manual (baseline)", |b| {
        b.iter(|| {
            let server = manual::Server::parse(black_box(args.clone()));
            black_box(server.unwrap())
        })
    });

    group.bench_function("derived (capture)", |b| {
        b.iter(|| {
            let mut opts = Options::new()
                .with_args(black_box(args.clone()))
                .with_env(MockEnv::new());
            let mut server = Server::default();
            capture(&mut opts, &mut server).unwrap();
            black_box(server)
        })
    });

    group.finish();
}

fn bench_scripted_prompts(c: &mut Criterion) {
    c.bench_function("scripted_prompts", |b| {
        b.iter(|| {
            let terminal = MockTerminal::with_answers(["example.com", "", "", "deb", "true"]);
            let mut opts = Options::new()
                .with_env(MockEnv::new())
                .with_terminal(terminal);
            let mut server = Server::default();
            capture(&mut opts, &mut server).unwrap();
            black_box(server)
        })
    });
}

fn bench_container_args(c: &mut Criterion) {
    let args = fleet_args();

    c.bench_function("container_args", |b| {
        b.iter(|| {
            let mut opts = Options::new()
                .with_args(black_box(args.clone()))
                .with_env(MockEnv::new());
            let mut fleet = Fleet::default();
            capture(&mut opts, &mut fleet).unwrap();
            black_box(fleet)
        })
    });
}

criterion_group!(
    benches,
    bench_manual_parsing,
    bench_derived_capture,
    bench_comparison,
    bench_scripted_prompts,
    bench_container_args
);
criterion_main!(benches);
