/// Stylesheet injected alongside the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleTheme {
    /// Overlay, panel and fly-in/fly-out animation only.
    #[default]
    Base,
    /// Base plus the Carrot palette and card styling.
    Carrot,
}

impl StyleTheme {
    #[must_use]
    pub fn stylesheet(self) -> String {
        match self {
            Self::Base => MODAL_BASE_STYLES.to_string(),
            Self::Carrot => format!("{MODAL_BASE_STYLES}{CARROT_MODAL_STYLES}"),
        }
    }
}

const MODAL_BASE_STYLES: &str = r"
@keyframes _ffFlyIn {
    from { opacity: 0; transform: translateY(50px); }
    to { opacity: 1; transform: translateY(0); }
}
@keyframes _ffFlyOut {
    from { opacity: 1; transform: translateY(0); }
    to { opacity: 0; transform: translateY(50px); }
}
._ffModal {
    position: fixed;
    inset: 0;
    display: flex;
    align-items: center;
    justify-content: center;
    z-index: 9999;
    background: rgba(0, 0, 0, 0.5);
    backdrop-filter: blur(3px);
}
._ffModalContent {
    position: relative;
    width: 100%;
    max-width: 35rem;
    max-height: 90vh;
    margin: 0.625rem;
    padding: 1rem;
    overflow-y: auto;
    background: white;
    border-radius: 8px;
    box-shadow: 0 10px 30px rgba(0, 0, 0, 0.15);
    animation: _ffFlyIn 0.3s ease-out;
}
._ffModal._ffClosing ._ffModalContent {
    animation: _ffFlyOut 0.2s ease-in forwards;
}
";

const CARROT_MODAL_STYLES: &str = r"
._ffModalContent {
    --color-light: oklch(0.99 0.0058 59.65);
    --color-light-soft: oklch(0.95 0.0067 53.45);
    --color-dark: oklch(0.25 0.0128 170.49);
    --color-dark-semi: oklch(0.36 0.0044 174.22);
    --color-middle: oklch(0.47 0.0082 174.07);
    --color-green: oklch(0.63 0.108 163.14);
    --color-orange: oklch(0.73 0.1615 39.96);
    --color-blue: oklch(0.61 0.095 228.13);
    display: flex;
    flex-direction: column;
    gap: 0.25rem;
    padding: 1.25rem;
    border: 2px solid var(--color-light-soft);
    border-radius: 1.5rem;
    background: var(--color-light);
}
._ffUpdateHeader { display: flex; align-items: center; gap: 0.5rem; }
._ffUpdateVersion {
    padding: 0.125rem 0.75rem;
    border-radius: 9999px;
    background: var(--color-green);
    color: var(--color-light);
    font-size: 0.875rem;
    font-weight: 600;
}
._ffUpdateDate { margin: 0; color: var(--color-middle); font-size: 0.875rem; font-weight: 500; }
._ffUpdateTitle { margin: 0 0 0.25rem; color: var(--color-dark); font-size: 1.5rem; font-weight: 600; }
._ffUpdateDescription { color: var(--color-middle); font-size: 0.9rem; }
._ffFeaturesList { display: flex; flex-direction: column; gap: 0.5rem; margin-top: 1rem; }
._ffFeature {
    padding: 0.625rem 0.75rem;
    border: 2px solid var(--color-light-soft);
    border-radius: 0.75rem;
    background: var(--color-light);
}
._ffFeatureHeader { display: flex; align-items: center; gap: 0.5rem; }
._ffFeatureIcon {
    display: inline-flex;
    flex-shrink: 0;
    align-items: center;
    justify-content: center;
    width: 1.25rem;
    height: 1.25rem;
    color: var(--color-dark);
}
._ffFeatureIcon svg { width: 100%; height: 100%; }
._ffFeatureIconFallback { font-weight: bold; }
._ffFeatureTitle { margin: 0; color: var(--color-dark); font-size: 1rem; font-weight: 600; }
._ffFeatureLabel {
    margin-left: auto;
    padding: 0.125rem 0.55rem;
    border-radius: 9999px;
    font-size: 0.8rem;
    font-weight: 600;
}
._ffFeatureLabel-new { color: var(--color-green); background: color-mix(in srgb, var(--color-green) 15%, transparent); }
._ffFeatureLabel-fix { color: var(--color-orange); background: color-mix(in srgb, var(--color-orange) 15%, transparent); }
._ffFeatureLabel-improvement { color: var(--color-blue); background: color-mix(in srgb, var(--color-blue) 15%, transparent); }
._ffFeatureText { margin-left: 1.75rem; color: var(--color-middle); font-size: 0.875rem; }
._ffModalClose {
    width: 100%;
    margin-top: 1.5rem;
    padding: 0.75rem 1.5rem;
    border: none;
    border-radius: 0.75rem;
    background: var(--color-dark);
    color: var(--color-light);
    font-weight: 600;
    transition: background 0.2s ease;
}
._ffModalClose:hover { background: var(--color-dark-semi); }
";
