use std::env;
use std::io::{self, Write};
use std::process;
use std::time::Instant;

use cedula::{
    CedulaGen, FractionDigits, currency, custom, identity_number, is_valid, parse_cedula,
    phone_number, tax_id,
};
use serde_json::json;

#[derive(Debug, Clone, Default)]
struct EmitOpts {
    municipality: Option<String>,
    count: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct FormatOpts {
    kind: String,
    input: String,
    template: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct CashOpts {
    amount: f64,
    digits: FractionDigits,
}

fn digits_from(value: Option<String>) -> Result<FractionDigits, String> {
    match value {
        Some(v) => parse_digits(&v).map_err(|e| format!("CASH_DIGITS: {e}")),
        None => Ok(FractionDigits::default()),
    }
}

fn default_digits() -> Result<FractionDigits, String> {
    digits_from(env::var("CASH_DIGITS").ok())
}

fn print_help() {
    eprintln!(
        "cedula - cédula validation and formatting CLI\n\n\
Usage:\n  cedula validate <id>\n  cedula parse <id> [--json]\n  cedula format <tax-id|identity|phone> <input>\n  cedula format custom <input> --template <template>\n  cedula cash <amount> [--digits 0|1|2]\n  cedula next [--municipality <ddd>] [--count <n>]\n  cedula bench [--count <n>]\n  cedula selftest\n\n\
Environment:\n  CASH_DIGITS  default fraction digits for cash (0, 1 or 2)\n  RUST_LOG     log filter (default: warn)\n"
    );
}

fn parse_digits(s: &str) -> Result<FractionDigits, String> {
    FractionDigits::parse(s).ok_or_else(|| "digits must be 0, 1 or 2".to_string())
}

fn parse_emit_flags(args: &[String]) -> Result<EmitOpts, String> {
    let mut opts = EmitOpts::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--municipality" => {
                if i + 1 >= args.len() {
                    return Err("missing value for --municipality".to_string());
                }
                opts.municipality = Some(args[i + 1].clone());
                i += 2;
            }
            "--count" => {
                if i + 1 >= args.len() {
                    return Err("missing value for --count".to_string());
                }
                opts.count = args[i + 1]
                    .parse::<usize>()
                    .map_err(|_| "invalid integer for --count".to_string())?;
                i += 2;
            }
            _ => return Err(format!("unknown flag: {}", args[i])),
        }
    }

    Ok(opts)
}

fn parse_format_args(args: &[String]) -> Result<FormatOpts, String> {
    if args.len() < 2 {
        return Err("format requires a kind and an input".to_string());
    }

    let mut opts = FormatOpts {
        kind: args[0].clone(),
        input: args[1].clone(),
        template: None,
    };

    let rest = &args[2..];
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "--template" => {
                if i + 1 >= rest.len() {
                    return Err("missing value for --template".to_string());
                }
                opts.template = Some(rest[i + 1].clone());
                i += 2;
            }
            _ => return Err(format!("unknown flag: {}", rest[i])),
        }
    }

    match (opts.kind.as_str(), &opts.template) {
        ("custom", None) => Err("format custom requires --template".to_string()),
        ("custom", Some(_)) => Ok(opts),
        ("tax-id" | "identity" | "phone", None) => Ok(opts),
        ("tax-id" | "identity" | "phone", Some(_)) => {
            Err("--template is only valid with format custom".to_string())
        }
        _ => Err("kind must be one of: tax-id, identity, phone, custom".to_string()),
    }
}

fn parse_cash_args(args: &[String], default: FractionDigits) -> Result<CashOpts, String> {
    if args.is_empty() {
        return Err("cash requires an amount".to_string());
    }

    let amount = args[0]
        .parse::<f64>()
        .map_err(|_| format!("invalid amount: {}", args[0]))?;
    let mut opts = CashOpts {
        amount,
        digits: default,
    };

    let rest = &args[1..];
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "--digits" => {
                if i + 1 >= rest.len() {
                    return Err("missing value for --digits".to_string());
                }
                opts.digits = parse_digits(&rest[i + 1])?;
                i += 2;
            }
            _ => return Err(format!("unknown flag: {}", rest[i])),
        }
    }

    Ok(opts)
}

fn generator_for(opts: &EmitOpts) -> Result<CedulaGen, String> {
    match &opts.municipality {
        Some(m) => CedulaGen::with_municipality(m).map_err(|e| e.to_string()),
        None => Ok(CedulaGen::new()),
    }
}

fn run_validate(args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        return Err("validate requires an id".to_string());
    }

    let ok = is_valid(&args[0]);
    println!("{}", if ok { "true" } else { "false" });
    if ok {
        Ok(())
    } else {
        Err("invalid cedula".to_string())
    }
}

fn run_parse(args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        return Err("parse requires an id".to_string());
    }

    let id = args[0].clone();
    let mut json_out = false;
    for arg in &args[1..] {
        if arg == "--json" {
            json_out = true;
        } else {
            return Err(format!("unknown flag: {}", arg));
        }
    }

    let parsed = parse_cedula(&id).map_err(|e| e.to_string())?;
    if json_out {
        println!(
            "{}",
            serde_json::to_string(&parsed).map_err(|e| e.to_string())?
        );
    } else {
        println!("raw={}", parsed.raw);
        println!("municipality={}", parsed.municipality);
        println!("sequence={}", parsed.sequence);
        println!("check_digit={}", parsed.check_digit);
        println!("formatted={}", parsed);
    }

    Ok(())
}

fn run_format(args: &[String]) -> Result<(), String> {
    let opts = parse_format_args(args)?;

    let formatted = match opts.kind.as_str() {
        "tax-id" => tax_id(&opts.input),
        "identity" => identity_number(&opts.input),
        "phone" => phone_number(&opts.input),
        _ => custom(&opts.input, opts.template.as_deref().unwrap_or_default()),
    }
    .map_err(|e| e.to_string())?;

    println!("{}", formatted);
    Ok(())
}

fn run_cash(args: &[String]) -> Result<(), String> {
    let opts = parse_cash_args(args, default_digits()?)?;
    println!("{}", currency(opts.amount, opts.digits));
    Ok(())
}

fn run_next(args: &[String]) -> Result<(), String> {
    let mut opts = parse_emit_flags(args)?;
    if opts.count == 0 {
        opts.count = 1;
    }

    let mut generator = generator_for(&opts)?;
    let mut stdout = io::stdout().lock();
    for cedula in generator.next_n(opts.count) {
        writeln!(stdout, "{}", cedula).map_err(|e| e.to_string())?;
    }
    stdout.flush().map_err(|e| e.to_string())?;
    Ok(())
}

fn bench_payload(n: usize, valid: usize, secs: f64) -> serde_json::Value {
    json!({
        "n": n,
        "valid": valid,
        "seconds": secs,
        "ops_per_sec": n as f64 / secs,
    })
}

fn run_bench(args: &[String]) -> Result<(), String> {
    let mut opts = parse_emit_flags(args)?;
    if opts.count == 0 {
        opts.count = 100_000;
    }

    let mut generator = generator_for(&opts)?;
    let samples = generator.next_n(opts.count);

    let start = Instant::now();
    let mut valid = 0usize;
    for s in &samples {
        if is_valid(s) && identity_number(s).is_ok() {
            valid += 1;
        }
    }
    let secs = start.elapsed().as_secs_f64().max(1e-9);

    let payload = bench_payload(opts.count, valid, secs);
    println!(
        "{}",
        serde_json::to_string(&payload).map_err(|e| e.to_string())?
    );
    Ok(())
}

fn run_selftest() -> Result<(), String> {
    let sample = CedulaGen::new().next_cedula();
    if !is_valid(&sample) {
        return Err(format!("selftest failed: generated invalid cedula {sample}"));
    }
    let formatted = identity_number(&sample).map_err(|e| e.to_string())?;
    if cedula::normalize(&formatted) != sample {
        return Err(format!("selftest failed: format round trip of {sample}"));
    }
    log::info!("selftest ok: {formatted}");
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        print_help();
        process::exit(2);
    }

    if args[0] == "-h" || args[0] == "--help" || args[0] == "help" {
        print_help();
        return;
    }

    let cmd = args[0].as_str();
    let rest = &args[1..];

    let res = match cmd {
        "validate" => run_validate(rest),
        "parse" => run_parse(rest),
        "format" => run_format(rest),
        "cash" => run_cash(rest),
        "next" => run_next(rest),
        "bench" => run_bench(rest),
        "selftest" => run_selftest(),
        _ => Err(format!("unknown command: {}", cmd)),
    };

    if let Err(err) = res {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_digits() {
        assert_eq!(parse_digits("0").unwrap(), FractionDigits::Zero);
        assert_eq!(parse_digits("2").unwrap(), FractionDigits::Two);
        assert!(parse_digits("bad").is_err());
    }

    #[test]
    fn test_digits_from_env_value() {
        assert_eq!(digits_from(None).unwrap(), FractionDigits::Zero);
        assert_eq!(digits_from(Some("1".to_string())).unwrap(), FractionDigits::One);
        assert_eq!(digits_from(Some("2".to_string())).unwrap(), FractionDigits::Two);

        let err = digits_from(Some("5".to_string())).unwrap_err();
        assert!(err.starts_with("CASH_DIGITS"));
        assert!(digits_from(Some(String::new())).is_err());
    }

    #[test]
    fn test_parse_emit_flags() {
        let opts = parse_emit_flags(&args(&["--municipality", "001", "--count", "3"])).unwrap();
        assert_eq!(opts.municipality.as_deref(), Some("001"));
        assert_eq!(opts.count, 3);
        assert!(parse_emit_flags(&args(&["--count"])).is_err());
        assert!(parse_emit_flags(&args(&["--count", "x"])).is_err());
        assert!(parse_emit_flags(&args(&["--W", "4"])).is_err());
    }

    #[test]
    fn test_parse_format_args() {
        let opts = parse_format_args(&args(&["phone", "8093458812"])).unwrap();
        assert_eq!(opts.kind, "phone");
        assert_eq!(opts.template, None);

        let opts =
            parse_format_args(&args(&["custom", "1234", "--template", "00-00"])).unwrap();
        assert_eq!(opts.template.as_deref(), Some("00-00"));

        assert!(parse_format_args(&args(&["custom", "1234"])).is_err());
        assert!(parse_format_args(&args(&["tax-id", "1", "--template", "0"])).is_err());
        assert!(parse_format_args(&args(&["zip", "1"])).is_err());
        assert!(parse_format_args(&args(&["phone"])).is_err());
    }

    #[test]
    fn test_parse_cash_args() {
        let opts = parse_cash_args(&args(&["4623", "--digits", "2"]), FractionDigits::Zero)
            .unwrap();
        assert_eq!(opts.amount, 4623.0);
        assert_eq!(opts.digits, FractionDigits::Two);

        let opts = parse_cash_args(&args(&["4623"]), FractionDigits::One).unwrap();
        assert_eq!(opts.digits, FractionDigits::One);

        assert!(parse_cash_args(&args(&["abc"]), FractionDigits::Zero).is_err());
        assert!(parse_cash_args(&args(&["1", "--digits", "3"]), FractionDigits::Zero).is_err());
        assert!(parse_cash_args(&[], FractionDigits::Zero).is_err());
    }

    #[test]
    fn test_generator_for_rejects_bad_municipality() {
        let opts = EmitOpts {
            municipality: Some("12".to_string()),
            count: 1,
        };
        assert!(generator_for(&opts).is_err());
    }

    #[test]
    fn test_bench_payload_fields() {
        let payload = bench_payload(10, 10, 0.5);
        assert_eq!(payload["n"], 10);
        assert_eq!(payload["valid"], 10);
        assert_eq!(payload["ops_per_sec"], 20.0);
        let keys: Vec<&String> = payload.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["n", "ops_per_sec", "seconds", "valid"]);
    }

    #[test]
    fn test_selftest() {
        assert!(run_selftest().is_ok());
    }
}
