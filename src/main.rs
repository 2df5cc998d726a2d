mod entry;
mod logger;

use faasbench::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
