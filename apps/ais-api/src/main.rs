use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = ais_api::Args::parse();

	ais_api::run(args).await
}
