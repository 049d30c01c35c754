pub mod generate;
pub mod templates;
pub mod validate;

pub type CmdResult<T> = pipewright::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (pipewright::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Generate(args) => dispatch!(args, global, generate),
        crate::Commands::Validate(args) => dispatch!(args, global, validate),
        crate::Commands::Templates(args) => dispatch!(args, global, templates),
    }
}
