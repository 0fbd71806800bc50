pub mod convert;
pub mod pack;

fn progress_style(msg: &str) -> indicatif::ProgressStyle {
    indicatif::ProgressStyle::with_template(
        format!("{msg} [{{elapsed_precise}}] {{bar:30.white}} {{pos:>7}}/{{len:7}} {{wide_msg}}")
            .as_str(),
    )
    .unwrap()
}
