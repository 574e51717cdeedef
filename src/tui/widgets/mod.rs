pub mod countdown;
pub mod stats_panel;
