//! `am0`: run an AM0 program.

fn main() {
    am_cli::main(am_cli::Dialect::Am0);
}
