//! Hosted runner: real clock, busy-wait execution, sleeping idle.
//!
//! Usage: `rtos-mk-host [rms|edf|mk] [duration_ms]`. Without a policy all
//! three run back to back. Log level comes from `RTOS_MK_LOG`.

use std::env;
use std::process::ExitCode;

use log::{error, LevelFilter};
use rtos_mk::logger;
use rtos_mk::{ConfigError, HostClock, Policy, Scheduler, SimConfig, REFERENCE_TASKSET};

fn main() -> ExitCode {
    let level = logger::parse_level(env::var("RTOS_MK_LOG").ok().as_deref(), LevelFilter::Info);
    if logger::init_stderr(level).is_err() {
        return ExitCode::FAILURE;
    }

    match run(env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), ConfigError> {
    let policies: Vec<Policy> = match args.first() {
        Some(name) => vec![name.parse()?],
        None => Policy::ALL.to_vec(),
    };
    let sim = match args.get(1) {
        Some(ms) => SimConfig::new(ms.parse().map_err(|_| ConfigError::InvalidDuration)?),
        None => SimConfig::default(),
    };

    for policy in policies {
        let mut sched = Scheduler::new(REFERENCE_TASKSET, policy, HostClock::new(), sim)?;
        sched.run().log();
    }
    Ok(())
}
