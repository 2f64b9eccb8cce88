use std::env;

use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use fuel_eng::Engine;
use fuel_eng::csv::{read_commands, read_tanks, write_tank_states};
use fuel_eng::store::MemoryLedger;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let usage = "usage: fuel-eng <tanks.csv> <transactions.csv>";
    let tanks_path = args.next().expect(usage);
    let commands_path = args.next().expect(usage);

    let store = MemoryLedger::new();
    let mut tank_ids = Vec::new();
    for result in read_tanks(&tanks_path) {
        match result {
            Ok((tank, config)) => {
                store.register_tank(&tank, config);
                tank_ids.push(tank);
            }
            Err(e) => {
                warn!("{e}");
            }
        }
    }

    let engine = Engine::new(store);
    let (cmd_sender, cmd_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in read_commands(&commands_path) {
            match result {
                Ok(command) => {
                    cmd_sender.send(command).await.unwrap();
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    engine.run(ReceiverStream::new(cmd_receiver)).await;

    let states = tank_ids.into_iter().filter_map(|tank| {
        match engine.tank_state(&tank) {
            Ok(state) => Some((tank, state)),
            Err(e) => {
                warn!(tank = %tank, "{e}");
                None
            }
        }
    });
    write_tank_states(states);
}
