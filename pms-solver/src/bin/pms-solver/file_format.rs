#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub(crate) enum FileFormat {
    Pms,
    Wcnf,
}
