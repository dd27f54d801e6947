/// Appends several commands to a function in order
#[macro_export]
macro_rules! push_cmds {
	($func:expr, $($cmd:expr);* $(;)?) => {
		$(
			$func.add_command($cmd);
		)*
	};
}
