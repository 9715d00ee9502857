use data_access::Order;

/// Confirmation dialog shown over a page before a destructive action.
///
/// Confirming submits a POST to `action`; cancelling follows `cancel_href`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmModal {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub action: String,
    pub cancel_href: String,
}

impl ConfirmModal {
    pub fn new(message: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            title: "Confirmation".to_string(),
            message: message.into(),
            confirm_label: "Confirm".to_string(),
            cancel_label: "Cancel".to_string(),
            action: action.into(),
            cancel_href: "/".to_string(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    pub fn cancel_href(mut self, href: impl Into<String>) -> Self {
        self.cancel_href = href.into();
        self
    }

    pub fn delete_order(order: &Order) -> Self {
        Self::new(
            format!(
                "Are you sure you want to delete the order for \"{}\"?",
                order.customer
            ),
            format!("/orders/{}/delete", order.id),
        )
        .title("Delete order")
        .confirm_label("Delete")
        .cancel_href("/orders")
    }
}
