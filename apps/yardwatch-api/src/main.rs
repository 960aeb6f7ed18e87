use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = yardwatch_api::Args::parse();

	yardwatch_api::run(args).await
}
