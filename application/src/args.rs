//! [`Args`] definitions.

use clap::{Parser, Subcommand};
use service::domain::{booking, layout, user};

/// Operator tool of the plot booking system.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// [`Command`] to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Command run by the tool.
#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Applies pending database migrations.
    Migrate,

    /// Lists layouts, newest first.
    Layouts {
        /// Lists only the layouts of this operator.
        #[arg(long)]
        owner: Option<user::Id>,
    },

    /// Lists plots of a layout.
    Plots {
        /// ID of the layout.
        layout: layout::Id,
    },

    /// Lists bookings on the plots of an operator's layouts.
    Bookings {
        /// ID of the operator.
        #[arg(long)]
        operator: user::Id,
    },

    /// Moves a booking into another status.
    Advance {
        /// ID of the booking.
        booking: booking::Id,

        /// Status to move the booking into.
        status: booking::Status,

        /// ID of the operator owning the booked plot.
        #[arg(long)]
        operator: user::Id,
    },
}
