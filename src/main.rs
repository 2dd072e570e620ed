use krbmv::args::{self, ArgumentsParser};
use krbmv::kerberos::ccache::NativeContext;
use krbmv::{logging, transfer};
use std::process::ExitCode;

fn main() -> ExitCode {
    let matches = args::command().get_matches();
    let arguments = ArgumentsParser::parse(&matches);
    logging::init(arguments.log_level);

    match transfer::run(NativeContext::new(), &arguments.to_request()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
