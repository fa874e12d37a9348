// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustdgst
// File: app.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2022 Volker Schwaberow

use crate::dgst::algorithm::Algorithm;
use crate::dgst::digest::commands::{digest_batch, DigestOptions};
use crate::dgst::output::OutputStyle;
use crate::dgst::weak;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches};
use log::debug;
use std::error::Error;
use std::ffi::OsString;
use std::io;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Name used for the binary, in help output and in diagnostics.
pub const PROGRAM_NAME: &str = "rdgst";

const HELP_TEMPLATE: &str = "{before-help}{name} {version}
Written by {author-with-newline}{about-with-newline}
Commands:
  rdgst md5    [-p] [-q] [-r] [-s string]... [file]...
  rdgst sha256 [-p] [-q] [-r] [-s string]... [file]...
{usage-heading} {usage}

{all-args}{after-help}
";

const SUBCOMMAND_AFTER_HELP: &str = "With no string and no file, \
	standard input is read. Inputs are processed in the order: \
	standard input, strings, files.";

fn digest_command(algorithm: Algorithm) -> clap::Command {
	clap::Command::new(algorithm.id())
		.about(algorithm.about())
		.after_help(SUBCOMMAND_AFTER_HELP)
		.arg(
			Arg::new("echo")
				.short('p')
				.help("Echo STDIN to STDOUT and append the checksum to STDOUT")
				.action(ArgAction::SetTrue),
		)
		.arg(
			Arg::new("quiet")
				.short('q')
				.help("Quiet mode: print only the checksum")
				.action(ArgAction::SetTrue),
		)
		.arg(
			Arg::new("reverse")
				.short('r')
				.help("Reverse the format of the output")
				.action(ArgAction::SetTrue),
		)
		.arg(
			Arg::new("string")
				.short('s')
				.value_name("STRING")
				.help("Print the checksum of the given string")
				.allow_hyphen_values(true)
				.action(ArgAction::Append),
		)
		.arg(
			Arg::new("FILE")
				.help("Files to digest")
				.action(ArgAction::Append),
		)
}

pub fn build_cli() -> clap::Command {
	let cli = clap::Command::new(PROGRAM_NAME)
		.color(clap::ColorChoice::Never)
		.help_template(HELP_TEMPLATE)
		.bin_name(PROGRAM_NAME)
		.version(clap::crate_version!())
		.author(clap::crate_authors!())
		.about("Compute message digests of files, strings and standard input")
		.subcommand_required(true)
		.arg_required_else_help(true);

	Algorithm::iter()
		.fold(cli, |cli, algorithm| cli.subcommand(digest_command(algorithm)))
}

fn values(args: &ArgMatches, id: &str) -> Vec<String> {
	args.get_many::<String>(id)
		.map(|values| values.cloned().collect())
		.unwrap_or_default()
}

/// Resolve parsed arguments into [`DigestOptions`].
pub fn options_from_matches(
	matches: &ArgMatches,
) -> Result<DigestOptions, clap::Error> {
	let (name, args) = matches.subcommand().ok_or_else(|| {
		build_cli().error(
			ErrorKind::MissingSubcommand,
			"a digest command is required",
		)
	})?;
	let algorithm = Algorithm::from_str(name).map_err(|_| {
		build_cli().error(
			ErrorKind::InvalidSubcommand,
			format!("'{name}' is an invalid command"),
		)
	})?;

	Ok(DigestOptions {
		algorithm,
		echo_stdin: args.get_flag("echo"),
		style: OutputStyle::from_flags(
			args.get_flag("quiet"),
			args.get_flag("reverse"),
		),
		strings: values(args, "string"),
		files: values(args, "FILE"),
	})
}

/// Parse a full argument vector, program name first.
pub fn parse_options<I, T>(args: I) -> Result<DigestOptions, clap::Error>
where
	I: IntoIterator<Item = T>,
	T: Into<OsString> + Clone,
{
	let matches = build_cli().try_get_matches_from(args)?;
	options_from_matches(&matches)
}

fn emit_weak_warning(options: &DigestOptions) -> io::Result<()> {
	if options.style == OutputStyle::Quiet || weak::suppressed_by_env() {
		return Ok(());
	}
	match weak::warning_for(options.algorithm) {
		Some(warning) => {
			weak::emit_warning_banner(&warning, &mut io::stderr().lock())
		}
		None => Ok(()),
	}
}

pub fn run() -> Result<(), Box<dyn Error>> {
	let matches = build_cli().get_matches();
	let options = match options_from_matches(&matches) {
		Ok(options) => options,
		Err(err) => err.exit(),
	};
	debug!("resolved options: {:?}", options);

	emit_weak_warning(&options)?;

	let stdin = io::stdin();
	let stdout = io::stdout();
	let outcome = digest_batch(
		&options,
		stdin.lock(),
		&mut stdout.lock(),
		&mut io::stderr().lock(),
	)?;

	if outcome.exit_code() != 0 {
		std::process::exit(outcome.exit_code());
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cli_definition_is_consistent() {
		build_cli().debug_assert();
	}

	#[test]
	fn parses_flags_strings_and_files() {
		let options = parse_options([
			"rdgst", "sha256", "-r", "-s", "abc", "a.txt", "-s", "", "b.txt",
		])
		.unwrap();
		assert_eq!(options.algorithm, Algorithm::Sha256);
		assert_eq!(options.style, OutputStyle::Reverse);
		assert!(!options.echo_stdin);
		assert_eq!(options.strings, vec!["abc".to_string(), String::new()]);
		assert_eq!(
			options.files,
			vec!["a.txt".to_string(), "b.txt".to_string()]
		);
		assert!(!options.reads_stdin());
	}

	#[test]
	fn quiet_overrides_reverse() {
		let options =
			parse_options(["rdgst", "md5", "-q", "-r", "-p"]).unwrap();
		assert_eq!(options.style, OutputStyle::Quiet);
		assert!(options.echo_stdin);
		assert!(options.reads_stdin());
	}

	#[test]
	fn string_may_look_like_a_flag() {
		let options = parse_options(["rdgst", "md5", "-s", "-p"]).unwrap();
		assert_eq!(options.strings, vec!["-p".to_string()]);
		assert!(!options.echo_stdin);
	}

	#[test]
	fn unknown_command_is_rejected() {
		let err = parse_options(["rdgst", "sha1", "file"]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
	}

	#[test]
	fn duplicate_flag_is_rejected() {
		let err = parse_options(["rdgst", "md5", "-q", "-q"]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
	}

	#[test]
	fn string_flag_requires_a_value() {
		let err = parse_options(["rdgst", "md5", "-s"]).unwrap_err();
		assert_ne!(err.kind(), ErrorKind::DisplayHelp);
		assert!(err.to_string().contains("-s"));
	}

	#[test]
	fn unknown_flag_is_rejected() {
		let err = parse_options(["rdgst", "md5", "-x"]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::UnknownArgument);
	}
}
