use crate::CLAP_STYLING;
use clap::{arg, command};
use sitelens_client::config::{API_TOKEN_ENV, API_URL_ENV, DEFAULT_API_URL};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitelens")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitelens")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--"api-url" <URL>)
                .required(false)
                .global(true)
                .help("Base URL of the crawl service")
                .env(API_URL_ENV)
                .default_value(DEFAULT_API_URL),
        )
        .arg(
            arg!(--"token" <TOKEN>)
                .required(false)
                .global(true)
                .help("Authorization token. A bare token is sent with the Bearer scheme")
                .env(API_TOKEN_ENV)
                .hide_env_values(true),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .global(true)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("30"),
        )
        .arg(
            arg!(--"page-size" <NUM>)
                .required(false)
                .global(true)
                .help("Items per page")
                .value_parser(clap::value_parser!(u32).range(1..))
                .default_value("10"),
        )
        .subcommand_required(false)
        .subcommand(command!("ui").about("Launch the interactive terminal UI"))
        .subcommand(
            command!("submit")
                .about("Submit a URL for analysis")
                .arg(arg!(<URL>).required(true).help("The http:// or https:// URL to analyze")),
        )
        .subcommand(
            command!("list")
                .about("List analyzed pages")
                .arg(page_arg())
                .arg(query_arg())
                .arg(
                    arg!(-s --"sort" <SORT>)
                        .required(false)
                        .help(
                            "Sort column with optional direction, e.g. page_title:asc. Columns: \
                        id, page_title, url, html_version, error, created_at",
                        )
                        .default_value("created_at:desc"),
                ),
        )
        .subcommand(
            command!("show")
                .about("Show the details of an analyzed page")
                .arg(
                    arg!(<ID>)
                        .required(true)
                        .help("Item id")
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(page_arg())
                .arg(query_arg()),
        )
        .subcommand(
            command!("delete")
                .about("Delete analyzed pages")
                .arg(ids_arg())
                .arg(page_arg())
                .arg(query_arg()),
        )
        .subcommand(
            command!("reanalyze")
                .about("Submit the URLs of analyzed pages for analysis again")
                .arg(ids_arg())
                .arg(page_arg())
                .arg(query_arg()),
        )
}

fn page_arg() -> clap::Arg {
    arg!(-p --"page" <PAGE>)
        .required(false)
        .help("Page to load")
        .value_parser(clap::value_parser!(u32).range(1..))
        .default_value("1")
}

fn query_arg() -> clap::Arg {
    arg!(--"query" <TEXT>)
        .required(false)
        .help("Search text matched against page title and URL")
}

fn ids_arg() -> clap::Arg {
    arg!(<ID>)
        .required(true)
        .num_args(1..)
        .help("Item ids on the loaded page")
        .value_parser(clap::value_parser!(i64))
}
