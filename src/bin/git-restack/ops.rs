#[derive(Copy, Clone, Debug, Default)]
#[non_exhaustive]
pub(crate) struct Palette {
    pub(crate) error: anstyle::Style,
    pub(crate) warn: anstyle::Style,
    pub(crate) good: anstyle::Style,
    pub(crate) highlight: anstyle::Style,
    pub(crate) debug: anstyle::Style,
    pub(crate) trace: anstyle::Style,
}

impl Palette {
    pub(crate) fn colored() -> Self {
        Self {
            error: anstyle::AnsiColor::Red.on_default() | anstyle::Effects::BOLD,
            warn: anstyle::AnsiColor::Yellow.on_default() | anstyle::Effects::BOLD,
            good: anstyle::AnsiColor::Cyan.on_default() | anstyle::Effects::BOLD,
            highlight: anstyle::AnsiColor::Green.on_default() | anstyle::Effects::BOLD,
            debug: anstyle::AnsiColor::Blue.on_default(),
            trace: anstyle::AnsiColor::Cyan.on_default(),
        }
    }

    pub(crate) fn plain() -> Self {
        Self::default()
    }

    pub(crate) fn error<D: std::fmt::Display>(self, display: D) -> Styled<D> {
        Styled::new(display, self.error)
    }

    pub(crate) fn warn<D: std::fmt::Display>(self, display: D) -> Styled<D> {
        Styled::new(display, self.warn)
    }

    pub(crate) fn good<D: std::fmt::Display>(self, display: D) -> Styled<D> {
        Styled::new(display, self.good)
    }

    pub(crate) fn highlight<D: std::fmt::Display>(self, display: D) -> Styled<D> {
        Styled::new(display, self.highlight)
    }

    pub(crate) fn debug<D: std::fmt::Display>(self, display: D) -> Styled<D> {
        Styled::new(display, self.debug)
    }

    pub(crate) fn trace<D: std::fmt::Display>(self, display: D) -> Styled<D> {
        Styled::new(display, self.trace)
    }
}

#[derive(Debug)]
pub(crate) struct Styled<D> {
    display: D,
    style: anstyle::Style,
}

impl<D: std::fmt::Display> Styled<D> {
    pub(crate) fn new(display: D, style: anstyle::Style) -> Self {
        Self { display, style }
    }
}

impl<D: std::fmt::Display> std::fmt::Display for Styled<D> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.style.render())?;
        self.display.fmt(f)?;
        write!(f, "{}", self.style.render_reset())?;
        Ok(())
    }
}
