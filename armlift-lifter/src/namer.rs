/// Counter-backed supply of unique temporary register names.
///
/// Owned by a translator instance; names stay unique across every
/// instruction that instance translates until [`TempNamer::reset`].
#[derive(Debug, Default)]
pub(crate) struct TempNamer {
    next: u64,
}

impl TempNamer {
    pub(crate) fn new() -> Self {
        TempNamer::default()
    }

    pub(crate) fn next_name(&mut self) -> String {
        let name = format!("t{}", self.next);
        self.next += 1;
        name
    }

    pub(crate) fn reset(&mut self) {
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_sequential_until_reset() {
        let mut namer = TempNamer::new();
        assert_eq!(namer.next_name(), "t0");
        assert_eq!(namer.next_name(), "t1");
        assert_eq!(namer.next_name(), "t2");
        namer.reset();
        assert_eq!(namer.next_name(), "t0");
    }
}
