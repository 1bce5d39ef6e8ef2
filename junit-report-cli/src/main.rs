// Copyright (c) The junit-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod dispatch;
mod errors;
mod output;
mod sample;

use clap::Parser;
use color_eyre::Result;
use dispatch::App;

fn main() -> Result<()> {
    color_eyre::install()?;

    let app = App::parse();
    app.output.init()?;
    app.exec();

    Ok(())
}
