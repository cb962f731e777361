const RULE_WIDTH: usize = 50;

fn rule() -> String {
    "*".repeat(RULE_WIDTH)
}

pub fn start_banner(name: &str) -> String {
    format!("Running Experiment {} ...\n{}\n\n", name, rule())
}

pub fn finish_banner(name: &str) -> String {
    let rule = rule();
    format!("Finished Experiment {} !!!\n{}\n{}\n\n", name, rule, rule)
}
