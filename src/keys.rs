use anyhow::Result;

/// Physical keys the scheduler can inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedKey {
    Char(char),
    Backspace,
    Enter,
}

/// Synthetic keystroke capability. Both halves may fail; failures are logged
/// by the caller and never abort an in-flight plan.
pub trait KeyInjector {
    fn press(&mut self, key: InjectedKey) -> Result<()>;
    fn release(&mut self, key: InjectedKey) -> Result<()>;
}

/// Default backend: records the stroke in the log and nothing else. Stands in
/// for an OS-level injector on setups where none is wired up.
pub struct NullInjector;

impl KeyInjector for NullInjector {
    fn press(&mut self, key: InjectedKey) -> Result<()> {
        log::debug!("press {key:?}");
        Ok(())
    }

    fn release(&mut self, key: InjectedKey) -> Result<()> {
        log::debug!("release {key:?}");
        Ok(())
    }
}
