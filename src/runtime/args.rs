use anyhow::anyhow;

/// Flags shared by the binaries. Everything else comes from `.env`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub network: Option<String>,
    pub token: Option<String>,
    pub help: bool,
}

/// Which optional flags a binary accepts beyond `--network` and `--help`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliSpec {
    pub accepts_token: bool,
}

pub fn parse_cli_args_from_iter<I, S>(args: I, spec: CliSpec) -> anyhow::Result<CliArgs>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = CliArgs::default();
    let mut iter = args.into_iter().map(|arg| arg.as_ref().to_string());
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => parsed.help = true,
            "--network" | "-n" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("missing value for {arg}"))?;
                if value.trim().is_empty() {
                    return Err(anyhow!("{arg} must not be empty"));
                }
                parsed.network = Some(value.trim().to_string());
            }
            "--token" | "-t" if spec.accepts_token => {
                parsed.token = Some(
                    iter.next()
                        .ok_or_else(|| anyhow!("missing value for {arg}"))?,
                );
            }
            other => return Err(anyhow!("unknown argument '{other}'")),
        }
    }
    Ok(parsed)
}

pub fn parse_cli_args(spec: CliSpec) -> anyhow::Result<CliArgs> {
    parse_cli_args_from_iter(std::env::args().skip(1), spec)
}
