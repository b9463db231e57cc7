use crate::cli::commands::diff::TableArgs;
use crate::cli::output::print_table;
use crate::core::config::Config;
use clap::Args;

#[derive(Args, Debug)]
pub struct AnnotateArgs {
    #[command(flatten)]
    pub table: TableArgs,
}

pub fn run(args: AnnotateArgs, config: &Config) -> anyhow::Result<()> {
    let table = args.table.build_table(config, true)?;
    tracing::info!("{} sites annotated", table.len());
    print_table(&table, args.table.pretty)?;
    Ok(())
}
