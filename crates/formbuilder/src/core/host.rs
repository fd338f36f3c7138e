use super::{
    field::FieldNode,
    id::{Container, FieldId},
    modal::{Modal, ModalHandle},
};

/// The presentation layer the editor drives. Everything visual, and every
/// blocking question to the user, goes through here.
pub trait Host {
    /// Draw a field, with its subtree, into `container`.
    fn render(&mut self, _field: FieldId, _node: &FieldNode, _container: Container) {}

    /// Ask a yes/no question. Blocks until answered.
    fn confirm(&mut self, message: &str) -> bool;

    /// Show a message.
    fn alert(&mut self, message: &str);

    /// Present a modal and return its handle.
    fn show_modal(&mut self, modal: &Modal) -> ModalHandle;

    /// Close a modal.
    fn hide_modal(&mut self, _handle: ModalHandle) {}

    /// Start fetching the help page. The host later calls
    /// `FormBuilder::show_help` with the body.
    fn fetch_help(&mut self, _url: &str) {}
}
