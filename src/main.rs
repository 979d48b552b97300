mod cli;
mod jq_exec;
mod logging;
mod path_de;

fn main() -> anyhow::Result<()> {
    let command_line_interface = cli::CommandLineInterface::load();
    logging::init(command_line_interface.verbose());
    command_line_interface.run()
}
