//! Headless dashboard: the state behind the tabs, cards, feed, product form
//! and swap list, driven through [`AdSwapClient`].
//!
//! Reads that fail leave an empty list (or zeroed stats). Mutations never
//! update state optimistically: on success they refetch what they touched,
//! on failure they push an error toast and change nothing else. The set of
//! requested products lives only in this value, so a fresh `Dashboard` lets
//! the user request the same product again.

use std::collections::HashSet;

use uuid::Uuid;

use crate::client::AdSwapClient;
use crate::models::product::{CreateProduct, Product, UpdateProduct, PLATFORMS};
use crate::models::stats::Stats;
use crate::models::swap::{SwapStatus, SwapWithProduct};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Dashboard,
    MyProducts,
    SwapRequests,
    Settings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SwapTab {
    #[default]
    Pending,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// Values of the product create/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub url: String,
    pub tagline: String,
    pub platform: String,
    pub logo_url: String,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: String::new(),
            tagline: String::new(),
            platform: PLATFORMS[0].to_string(),
            logo_url: String::new(),
        }
    }
}

impl ProductForm {
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            url: product.url.clone(),
            tagline: product.tagline.clone(),
            platform: product.platform.clone(),
            logo_url: product.logo_url.clone().unwrap_or_default(),
        }
    }

    pub fn is_complete(&self) -> bool {
        [&self.name, &self.url, &self.tagline, &self.platform]
            .iter()
            .all(|v| !v.is_empty())
    }

    fn logo(&self) -> Option<String> {
        Some(self.logo_url.clone()).filter(|l| !l.is_empty())
    }

    fn to_create(&self) -> CreateProduct {
        CreateProduct {
            name: Some(self.name.clone()),
            url: Some(self.url.clone()),
            tagline: Some(self.tagline.clone()),
            platform: Some(self.platform.clone()),
            logo_url: self.logo(),
        }
    }

    fn to_update(&self) -> UpdateProduct {
        UpdateProduct {
            name: Some(Some(self.name.clone())),
            url: Some(Some(self.url.clone())),
            tagline: Some(Some(self.tagline.clone())),
            platform: Some(Some(self.platform.clone())),
            logo_url: Some(self.logo()),
        }
    }
}

#[derive(Debug)]
pub struct Dashboard {
    client: AdSwapClient,
    tab: Tab,
    swap_tab: SwapTab,
    stats: Stats,
    feed: Vec<Product>,
    my_products: Vec<Product>,
    swaps: Vec<SwapWithProduct>,
    requested: HashSet<Uuid>,
    editing: Option<Product>,
    toasts: Vec<Toast>,
}

impl Dashboard {
    pub fn new(client: AdSwapClient) -> Self {
        Self {
            client,
            tab: Tab::default(),
            swap_tab: SwapTab::default(),
            stats: Stats::default(),
            feed: Vec::new(),
            my_products: Vec::new(),
            swaps: Vec::new(),
            requested: HashSet::new(),
            editing: None,
            toasts: Vec::new(),
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn swap_tab(&self) -> SwapTab {
        self.swap_tab
    }

    pub fn select_swap_tab(&mut self, tab: SwapTab) {
        self.swap_tab = tab;
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn feed(&self) -> &[Product] {
        &self.feed
    }

    pub fn my_products(&self) -> &[Product] {
        &self.my_products
    }

    pub fn swaps(&self) -> &[SwapWithProduct] {
        &self.swaps
    }

    pub fn pending_swaps(&self) -> Vec<&SwapWithProduct> {
        self.swaps_with(SwapStatus::Pending)
    }

    pub fn completed_swaps(&self) -> Vec<&SwapWithProduct> {
        self.swaps_with(SwapStatus::Completed)
    }

    /// Swaps shown under the selected pending/completed tab.
    pub fn visible_swaps(&self) -> Vec<&SwapWithProduct> {
        match self.swap_tab {
            SwapTab::Pending => self.pending_swaps(),
            SwapTab::Completed => self.completed_swaps(),
        }
    }

    fn swaps_with(&self, status: SwapStatus) -> Vec<&SwapWithProduct> {
        self.swaps
            .iter()
            .filter(|s| s.swap.status == status)
            .collect()
    }

    /// Whether the "Request Swap" button for `product_id` is disabled.
    pub fn is_requested(&self, product_id: Uuid) -> bool {
        self.requested.contains(&product_id)
    }

    pub fn editing(&self) -> Option<&Product> {
        self.editing.as_ref()
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn last_toast(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    fn toast(&mut self, kind: ToastKind, message: &str) {
        self.toasts.push(Toast {
            kind,
            message: message.to_string(),
        });
    }

    /// Refetch everything the dashboard shows.
    pub async fn refresh_all(&mut self) {
        let (stats, feed, swaps, mine) = tokio::join!(
            self.client.stats(),
            self.client.feed(),
            self.client.swaps(),
            self.client.my_products(),
        );
        self.stats = or_empty("stats", stats);
        self.feed = or_empty("feed", feed);
        self.swaps = or_empty("swaps", swaps);
        self.my_products = or_empty("my products", mine);
    }

    async fn refresh_swaps_and_stats(&mut self) {
        let (swaps, stats) = tokio::join!(self.client.swaps(), self.client.stats());
        self.swaps = or_empty("swaps", swaps);
        self.stats = or_empty("stats", stats);
    }

    async fn refresh_products(&mut self) {
        let (mine, feed) = tokio::join!(self.client.my_products(), self.client.feed());
        self.my_products = or_empty("my products", mine);
        self.feed = or_empty("feed", feed);
    }

    /// Request a swap on a feed product. Returns whether a request was made.
    pub async fn request_swap(&mut self, product_id: Uuid) -> bool {
        if self.is_requested(product_id) {
            return false;
        }
        match self.client.request_swap(product_id).await {
            Ok(swap) => {
                tracing::debug!(swap_id = %swap.id, "Swap requested");
                self.requested.insert(product_id);
                self.toast(ToastKind::Success, "Swap requested");
                self.refresh_swaps_and_stats().await;
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "Swap request failed");
                self.toast(ToastKind::Error, "Request failed");
                false
            }
        }
    }

    /// Confirm the promotion for a swap. Returns whether it succeeded.
    pub async fn confirm_swap(&mut self, swap_id: Uuid) -> bool {
        match self.client.confirm_swap(swap_id).await {
            Ok(_) => {
                self.toast(ToastKind::Success, "Swap confirmed");
                self.refresh_swaps_and_stats().await;
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "Swap confirmation failed");
                self.toast(ToastKind::Error, "Confirm failed");
                false
            }
        }
    }

    /// Open the form on one of the user's products. Returns its prefilled values.
    pub fn begin_edit(&mut self, product_id: Uuid) -> Option<ProductForm> {
        let product = self
            .my_products
            .iter()
            .find(|p| p.id == product_id)?
            .clone();
        let form = ProductForm::from_product(&product);
        self.editing = Some(product);
        self.tab = Tab::MyProducts;
        Some(form)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Submit the product form: update when editing, create otherwise.
    pub async fn save_product(&mut self, form: &ProductForm) -> bool {
        if !form.is_complete() {
            self.toast(ToastKind::Error, "Please fill all required fields");
            return false;
        }

        let result = match &self.editing {
            Some(product) => self
                .client
                .update_product(product.id, &form.to_update())
                .await
                .map(|_| "Product updated"),
            None => self
                .client
                .create_product(&form.to_create())
                .await
                .map(|_| "Product added"),
        };

        match result {
            Ok(message) => {
                self.toast(ToastKind::Success, message);
                self.editing = None;
                self.refresh_products().await;
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "Saving product failed");
                self.toast(ToastKind::Error, "Save failed");
                false
            }
        }
    }
}

fn or_empty<T: Default, E: std::fmt::Display>(what: &'static str, result: Result<T, E>) -> T {
    result.unwrap_or_else(|e| {
        tracing::debug!(what, error = %e, "Dashboard read failed");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn default_form_targets_first_platform() {
        let form = ProductForm::default();
        assert_eq!(form.platform, "Twitter");
        assert_eq!(form.platform, PLATFORMS[0]);
        assert!(PLATFORMS.contains(&"Newsletter"));
        assert!(!form.is_complete());
    }

    #[test]
    fn form_from_product_and_back() {
        let product = Product {
            id: Uuid::new_v4(),
            user_id: "alice".to_string(),
            name: "Foo".to_string(),
            url: "https://foo.example".to_string(),
            tagline: "t".to_string(),
            platform: "Blog".to_string(),
            logo_url: None,
            created_at: Utc::now(),
        };
        let form = ProductForm::from_product(&product);
        assert!(form.is_complete());
        assert_eq!(form.logo_url, "");

        let update = form.to_update();
        assert_eq!(update.logo_url, Some(None));
        assert_eq!(update.platform, Some(Some("Blog".to_string())));
        assert_eq!(form.to_create().logo_url, None);
    }

    #[test]
    fn fresh_dashboard_state() {
        let dashboard = Dashboard::new(AdSwapClient::new("http://127.0.0.1:9"));
        assert_eq!(dashboard.tab(), Tab::Dashboard);
        assert_eq!(dashboard.swap_tab(), SwapTab::Pending);
        assert_eq!(dashboard.stats(), Stats::default());
        assert!(dashboard.visible_swaps().is_empty());
        assert!(dashboard.last_toast().is_none());
    }

    #[tokio::test]
    async fn incomplete_form_is_rejected_locally() {
        let mut dashboard = Dashboard::new(AdSwapClient::new("http://127.0.0.1:9"));
        let saved = dashboard.save_product(&ProductForm::default()).await;
        assert!(!saved);
        assert_eq!(
            dashboard.last_toast().map(|t| t.message.as_str()),
            Some("Please fill all required fields")
        );
    }
}
