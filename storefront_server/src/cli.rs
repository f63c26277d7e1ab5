use std::{env, env::VarError};

/// The server takes no arguments. Passing any prints the help text instead of starting the server.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Secrets are deliberately left off this list
    const DISPLAY_ENVS: [&str; 11] = [
        "RUST_LOG",
        "SFS_HOST",
        "SFS_PORT",
        "SFS_DATABASE_URL",
        "SFS_RUN_MIGRATIONS",
        "SFS_STRIPE_API_URL",
        "SFS_STRIPE_SIGNATURE_TOLERANCE",
        "SFS_TAX_RATE_BPS",
        "SFS_STANDARD_SHIPPING_CENTS",
        "SFS_FREE_SHIPPING_THRESHOLD_CENTS",
        "SFS_DEFAULT_COUNTRY",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
