use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pomotracker")]
#[command(about = "Pomodoro timer that reports completed sessions to a stats backend")]
pub struct Cli {
    /// Backend base URL (overrides server.base_url from the config file)
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the interactive timer (default)
    Timer {
        /// Countdown length in minutes (1-60; out-of-range values are clamped)
        #[arg(long, allow_hyphen_values = true)]
        minutes: Option<String>,
    },

    /// Report a number of completed pomodoros without running the timer
    Save {
        /// Number of completed pomodoros, at least 1
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,

        /// Target year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Target month, 1-12 (defaults to the current month)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },

    /// Show aggregate statistics
    Stats {
        /// Only count sessions from this year
        #[arg(long)]
        year: Option<i32>,

        /// Only count sessions from this month, 1-12
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },

    /// List the years that have recorded pomodoros
    Years,

    /// Show where config and log files are stored
    Paths,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_timer() {
        let cli = Cli::try_parse_from(["pomotracker"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.server.is_none());
    }

    #[test]
    fn timer_minutes_accepts_garbage_for_clamping() {
        let cli = Cli::try_parse_from(["pomotracker", "timer", "--minutes", "-3"]).unwrap();
        match cli.command {
            Some(Command::Timer { minutes }) => assert_eq!(minutes.as_deref(), Some("-3")),
            _ => panic!("expected timer"),
        }
    }

    #[test]
    fn save_with_targets() {
        let cli = Cli::try_parse_from([
            "pomotracker",
            "--server",
            "http://pomo:8000",
            "save",
            "4",
            "--year",
            "2024",
            "--month",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://pomo:8000"));
        match cli.command {
            Some(Command::Save { count, year, month }) => {
                assert_eq!(count, 4);
                assert_eq!(year, Some(2024));
                assert_eq!(month, Some(2));
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn empty_save_rejected() {
        assert!(Cli::try_parse_from(["pomotracker", "save", "0"]).is_err());
        assert!(Cli::try_parse_from(["pomotracker", "save", "1"]).is_ok());
    }

    #[test]
    fn month_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["pomotracker", "stats", "--month", "13"]).is_err());
    }
}
