pub mod check_run;
pub mod console;
pub mod markdown;
