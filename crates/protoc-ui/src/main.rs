use clap::Parser;

fn main() -> anyhow::Result<()> {
    protoc_ui::init();

    let cli = protoc_ui::cli::Cli::parse();
    protoc_ui::cli::run(cli)
}
