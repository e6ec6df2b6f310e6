// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! `routerd`: the UDP adapter around [`bgp_router_core`]. Parses the
//! command line into a [`config::RouterConfig`], binds one socket per
//! neighbor, sends the startup handshakes, and hands control to the
//! Dispatcher poll loop. This binary is the only place in the workspace
//! that touches `std::net`, `clap`, or `serde_json`; the core library
//! stays free of all three.

mod config;
mod message;
mod transport;

use std::process::ExitCode;

use bgp_router_core::router::Router;
use clap::Parser;
use thiserror::Error;

use config::{Args, RouterConfig};
use transport::NeighborLink;

/// Top-level adapter error: config parsing or transport setup failed.
#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Transport(#[from] transport::AdapterError),
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();
    let config = RouterConfig::from_args(&args)?;

    log::info!(
        "starting as AS{} with {} neighbor(s)",
        config.asn,
        config.neighbors.len()
    );

    let mut router = Router::new(config.asn, config.neighbors.iter().map(|n| n.info));

    let links = config
        .neighbors
        .iter()
        .map(|&spec| NeighborLink::bind(spec))
        .collect::<Result<Vec<_>, _>>()?;
    for link in &links {
        log::info!("listening for {} on port {}", link.spec.info.relation, link.spec.port);
    }

    transport::send_handshakes(&links)?;
    transport::run(&mut router, &links)?;
    Ok(())
}
