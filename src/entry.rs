use clap::Parser;
use tracing::{error, info};

use faasbench::app::{run_benchmark, run_merge, run_plot};
use faasbench::args::{BenchArgs, Command};
use faasbench::error::AppResult;

use crate::logger::init_logging;

pub(crate) fn run() -> AppResult<()> {
    let args = BenchArgs::parse();

    init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime
        .block_on(run_async(args))
        .inspect_err(|err| error!("{}", err))
}

async fn run_async(args: BenchArgs) -> AppResult<()> {
    match args.command.as_ref() {
        Some(Command::Merge(merge)) => {
            let rows = run_merge(merge).await?;
            info!("Merged {} row(s)", rows);
            println!("Merged summary written to {}", merge.output.display());
        }
        Some(Command::Plot(plot)) => {
            run_plot(plot).await?;
            println!("Plots written to {}", plot.output_dir.display());
        }
        None => {
            let metadata = run_benchmark(&args).await?;
            println!("{}", metadata.to_pretty_json()?);
        }
    }
    Ok(())
}
