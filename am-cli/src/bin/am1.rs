//! `am1`: run an AM1 program.

fn main() {
    am_cli::main(am_cli::Dialect::Am1);
}
