use std::fs;
use std::path::Path;

fn write_minimal_env_template(file: &mut fs::File) -> std::io::Result<()> {
    use std::io::Write;
    writeln!(file, "# IVM deployment configuration")?;
    writeln!(file)?;
    writeln!(file, "NETWORK=\"hardhat\"")?;
    writeln!(file, "SEPOLIA_RPC_URL=\"https://sepolia.infura.io/v3/CHANGE_ME\"")?;
    writeln!(file, "MAINNET_RPC_URL=\"\"")?;
    writeln!(file, "PRIVATE_KEY=\"\"")?;
    writeln!(file, "ETHERSCAN_API_KEY=\"\"")?;
    writeln!(file)?;
    writeln!(file, "MARKETING_WALLET=\"\"")?;
    writeln!(file, "DEVELOPMENT_WALLET=\"\"")?;
    writeln!(file, "TEAM_WALLET=\"\"")?;
    writeln!(file, "RESERVE_WALLET=\"\"")?;
    writeln!(file, "LOYALTY_WALLET=\"\"")?;
    writeln!(file)?;
    writeln!(file, "IVM_TOKEN_ADDRESS=\"\"")?;
    writeln!(file, "RUST_LOG=\"info\"")?;
    Ok(())
}

/// Parse one `.env` line into `(key, value)`, unwrapping quotes and trailing comments.
fn parse_env_line(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    let value_no_comment = value.split('#').next().unwrap_or("").trim();
    let parsed = if value_no_comment.len() >= 2
        && ((value_no_comment.starts_with('"') && value_no_comment.ends_with('"'))
            || (value_no_comment.starts_with('\'') && value_no_comment.ends_with('\'')))
    {
        &value_no_comment[1..value_no_comment.len() - 1]
    } else {
        value_no_comment
    };
    Some((key, parsed))
}

fn load_dot_env() {
    let path = Path::new(".env");
    if !path.exists() {
        return;
    }

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ENV] Failed to read .env: {}", e);
            return;
        }
    };

    for line in content.lines() {
        let Some((key, value)) = parse_env_line(line) else {
            continue;
        };
        if std::env::var_os(key).is_some() {
            continue;
        }
        std::env::set_var(key, value);
    }
}

fn ensure_env_example_exists() {
    let env_example = Path::new(".env.example");
    if !env_example.exists() {
        if let Ok(mut file) = fs::File::create(env_example) {
            let _ = write_minimal_env_template(&mut file);
        }
    }
}

/// Load `.env` without overriding variables already present in the process environment.
pub fn harden_env_setup() {
    ensure_env_example_exists();
    load_dot_env();
}
