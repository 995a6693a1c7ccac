//! # zsender-app
//!
//! ZSENDER 명령행 진입점.
//! 설정 로드, 로깅 초기화, 측정값 전송/호스트 등록 명령 실행, 결과 출력.
//! 종료 코드 결정은 여기서만 한다. 라이브러리 crate는 에러를 반환할 뿐이다.

mod input;
mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use zsender_core::config::ClockPolicy;
use zsender_core::error::CoreError;
use zsender_core::models::metric::{Metric, MetricKind};
use zsender_core::models::response::Response;
use zsender_network::sender::{BatchOutcome, ZabbixSender};

/// Zabbix sender 프로토콜 클라이언트
#[derive(Parser, Debug)]
#[command(name = "zsender")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼별 설정 디렉토리의 config.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// 서버 호스트
    #[arg(long, short = 'z', global = true)]
    server: Option<String>,

    /// 서버 포트
    #[arg(long, short = 'p', global = true)]
    port: Option<u16>,

    /// clock이 없는 측정값에 현재 시각 기록
    #[arg(long, global = true)]
    stamp_now: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 측정값 하나 전송
    Send {
        /// 대상 호스트
        #[arg(long, short = 's')]
        host: String,
        /// 아이템 키
        #[arg(long, short = 'k')]
        key: String,
        /// 값
        #[arg(long, short = 'o')]
        value: String,
        /// Active 아이템으로 전송 (`agent data`)
        #[arg(long)]
        active: bool,
        /// Unix 타임스탬프 (초)
        #[arg(long)]
        clock: Option<i64>,
    },
    /// 파일의 측정값 전송 (`-`는 표준 입력)
    SendFile {
        /// 입력 파일 경로
        path: PathBuf,
        /// 모든 측정값을 Active 아이템으로 전송
        #[arg(long)]
        active: bool,
    },
    /// 호스트 자동 등록
    Register {
        /// 등록할 호스트
        #[arg(long, short = 's')]
        host: String,
        /// 호스트 메타데이터
        #[arg(long, short = 'm')]
        metadata: Option<String>,
    },
}

fn kind_of(active: bool) -> MetricKind {
    if active {
        MetricKind::Active
    } else {
        MetricKind::Trapper
    }
}

/// 입력 파일(또는 표준 입력)에서 측정값 읽기
fn read_metrics(path: &Path, kind: MetricKind) -> Result<Vec<Metric>> {
    let metrics = if path.as_os_str() == "-" {
        input::parse_metrics(std::io::stdin().lock(), kind)?
    } else {
        let file = std::fs::File::open(path)
            .with_context(|| format!("입력 파일 열기 실패: {}", path.display()))?;
        input::parse_metrics(BufReader::new(file), kind)?
    };
    Ok(metrics)
}

/// 배치 결과 한 줄 출력. 성공이면 true
fn report_batch(label: &str, result: &Result<Response, CoreError>) -> bool {
    match result {
        Ok(resp) => {
            let detail = match resp.summary() {
                Ok(summary) => summary.to_string(),
                Err(_) => resp.info.clone(),
            };
            println!("{label}: {} ({detail})", resp.response);
            resp.is_success()
        }
        Err(e) => {
            error!("{label} 전송 실패: {e}");
            println!("{label}: error ({e})");
            false
        }
    }
}

fn report(outcome: &BatchOutcome) -> bool {
    let mut ok = true;
    if let Some(result) = &outcome.active {
        ok &= report_batch("agent data", result);
    }
    if let Some(result) = &outcome.trapper {
        ok &= report_batch("sender data", result);
    }
    ok
}

async fn run(args: Args) -> Result<bool> {
    let mut config = settings::load(args.config.as_deref())?;

    // CLI 인자로 설정 오버라이드
    if let Some(server) = args.server {
        config.server.host = server;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.stamp_now {
        config.clock_policy = ClockPolicy::StampNow;
    }

    let sender = ZabbixSender::new(&config).context("송신기 생성 실패")?;
    info!(
        "서버: {}, 타임아웃 connect={}ms write={}ms read={}ms, clock={:?}",
        sender.endpoint(),
        config.timeouts.connect_ms,
        config.timeouts.write_ms,
        config.timeouts.read_ms,
        config.clock_policy
    );

    let ok = match args.command {
        Command::Send {
            host,
            key,
            value,
            active,
            clock,
        } => {
            let mut metric = Metric::with_kind(host, key, value, kind_of(active));
            metric.clock = clock;
            report(&sender.send_metrics(vec![metric]).await)
        }
        Command::SendFile { path, active } => {
            let metrics = read_metrics(&path, kind_of(active))?;
            if metrics.is_empty() {
                println!("전송할 측정값 없음");
                return Ok(true);
            }
            info!("측정값 {}개 전송", metrics.len());
            report(&sender.send_metrics(metrics).await)
        }
        Command::Register { host, metadata } => {
            match sender.register_host(&host, metadata.as_deref()).await {
                Ok(()) => {
                    println!("registered: {host}");
                    true
                }
                Err(e) => {
                    error!("호스트 자동 등록 실패: {e}");
                    println!("register {host}: error ({e})");
                    false
                }
            }
        }
    };

    Ok(ok)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // tracing 초기화 (결과 출력과 섞이지 않도록 stderr)
    let log_filter = format!(
        "zsender={},zsender_app={},zsender_core={},zsender_network={}",
        args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("zsender: {e:#}");
            ExitCode::FAILURE
        }
    }
}
