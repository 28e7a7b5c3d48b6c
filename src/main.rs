use blossom_match::cli::Cli;
use clap::Parser;

pub fn main() {
    env_logger::init();
    Cli::parse().run();
}
