use crate::attributes::{Attributes, PlatformHandle};
use crate::element::Element;
use crate::styled::StyledText;

/// Host-supplied styling for BBCode elements.
///
/// `supported_tags` and `attributes_for_element` are required. The other hooks
/// default to "no opinion". The compiler only calls the provider through `&self`
/// and at most once per hook per element, so a provider shared across threads
/// only needs to be `Sync`.
pub trait StyleProvider {
    /// Tag names the host can style. Anything else is filtered out of the tree
    /// before styling. Names are matched case-insensitively.
    fn supported_tags(&self) -> Vec<String>;

    /// Attributes for the text of a whitelisted element. `None` means the host
    /// has nothing for this element.
    fn attributes_for_element(&self, element: &Element) -> Option<Attributes>;

    /// Replacement display text for the element's whole content.
    fn text_for_element(&self, _element: &Element) -> Option<String> {
        None
    }

    /// Pre-styled replacement for the element's whole content. Takes
    /// precedence over every other hook.
    fn attributed_text_for_element(&self, _element: &Element) -> Option<StyledText> {
        None
    }

    /// Legacy font hook, consulted only when `attributes_for_element` has nothing.
    fn font(&self, _element: &Element) -> Option<PlatformHandle> {
        None
    }

    /// Legacy text color hook, consulted only when `attributes_for_element` has nothing.
    fn text_color(&self, _element: &Element) -> Option<PlatformHandle> {
        None
    }
}

impl<P: StyleProvider + ?Sized> StyleProvider for &P {
    fn supported_tags(&self) -> Vec<String> {
        (**self).supported_tags()
    }

    fn attributes_for_element(&self, element: &Element) -> Option<Attributes> {
        (**self).attributes_for_element(element)
    }

    fn text_for_element(&self, element: &Element) -> Option<String> {
        (**self).text_for_element(element)
    }

    fn attributed_text_for_element(&self, element: &Element) -> Option<StyledText> {
        (**self).attributed_text_for_element(element)
    }

    fn font(&self, element: &Element) -> Option<PlatformHandle> {
        (**self).font(element)
    }

    fn text_color(&self, element: &Element) -> Option<PlatformHandle> {
        (**self).text_color(element)
    }
}
