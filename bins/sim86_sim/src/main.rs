mod config;

use clap::Parser;
use config::Config;
use sim86_simulator::{Simulator, State, Step};

fn indented(state: &State) -> String {
    state
        .to_string()
        .lines()
        .map(|line| format!("    {}\n", line))
        .collect()
}

fn format_step(step: &Step) -> String {
    format!("{}\n{}", step, indented(&step.state))
}

fn simulate(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(&config.binary)?;
    let instructions = sim86_decoder::decode(&data)?;

    tracing::info!(
        "Simulating {} instructions from {}",
        instructions.len(),
        config.binary.display()
    );

    let mut simulator = Simulator::new(instructions);

    let result = simulator.run_with(|step| {
        if !config.quiet {
            println!("{}", format_step(step));
        }
    });

    println!("final state:");
    print!("{}", indented(simulator.state()));

    Ok(result?)
}

fn main() {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(config.log_level())
        .init();

    if let Err(err) = simulate(&config) {
        eprintln!("{}: {}", config.binary.display(), err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_output() {
        let instructions = sim86_decoder::decode(&[0xB9, 0x0C, 0x00]).unwrap();
        let mut simulator = Simulator::new(instructions);
        let step = simulator.step().unwrap().unwrap();

        let text = format_step(&step);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "mov cx, 12 ; ip: 0x0000 -> 0x0003");
        assert_eq!(lines[3], "    cx: 0x000c (12)");
        assert_eq!(lines[13], "    ip: 0x0003 (3)");
        assert_eq!(lines[14], "    flags:");
    }
}
