//! E-commerce stores and their nested resources:
//! `/ecommerce/stores/{store_id}/{customers,carts,orders,products}` and
//! `/ecommerce/stores/{store_id}/products/{product_id}/variants`.
//!
//! Stores, products and variants double as request bodies and responses.
//! Products and variants don't carry their parents' ids in the JSON, so the
//! dispatcher hands them over as `ParentKeys` when they are decoded.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::{Client, Request};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::params::{BasicQueryParams, ExtendedQueryParams};
use crate::resource::{attached, require_id, segment, Link, ParentKeys, Resource};

const STORES_PATH: &str = "/ecommerce/stores";

fn store_path(store_id: &str) -> String {
    format!("{STORES_PATH}/{}", segment(store_id))
}

fn store_child_path(store_id: &str, collection: &str) -> String {
    format!("{}/{collection}", store_path(store_id))
}

fn store_item_path(store_id: &str, collection: &str, id: &str) -> String {
    format!("{}/{collection}/{}", store_path(store_id), segment(id))
}

fn variants_path(store_id: &str, product_id: &str) -> String {
    format!("{}/variants", store_item_path(store_id, "products", product_id))
}

fn variant_path(store_id: &str, product_id: &str, id: &str) -> String {
    format!("{}/{}", variants_path(store_id, product_id), segment(id))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address1: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address2: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub province: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub province_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub postal_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Store {
    pub id: String,
    pub list_id: String,
    pub currency_code: String,
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub platform: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub money_format: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub primary_locale: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timezone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    #[serde(skip_serializing)]
    pub created_at: String,
    #[serde(skip_serializing)]
    pub updated_at: String,
    #[serde(rename = "_links", skip_serializing)]
    pub links: Vec<Link>,

    #[serde(skip)]
    client: Option<Client>,
}

impl Resource for Store {
    fn attach(&mut self, client: &Client, _parent: &ParentKeys) {
        self.client = Some(client.clone());
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreList {
    pub stores: Vec<Store>,
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
}

impl Resource for StoreList {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        self.stores.attach(client, parent);
    }
}

impl Store {
    /// A store body with the fields the service requires.
    pub fn new(
        id: impl Into<String>,
        list_id: impl Into<String>,
        currency_code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            list_id: list_id.into(),
            currency_code: currency_code.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Client {
    pub async fn get_stores(
        &self,
        cancel: &CancellationToken,
        params: Option<&ExtendedQueryParams>,
    ) -> Result<StoreList, ApiError> {
        self.fetch(cancel, Request::get(STORES_PATH).query(params)).await
    }

    pub async fn get_store(
        &self,
        cancel: &CancellationToken,
        id: &str,
        params: Option<&BasicQueryParams>,
    ) -> Result<Store, ApiError> {
        require_id("store", "id", id)?;
        self.fetch(cancel, Request::get(store_path(id)).query(params)).await
    }

    pub async fn create_store(&self, cancel: &CancellationToken, body: &Store) -> Result<Store, ApiError> {
        self.fetch(cancel, Request::post(STORES_PATH).json(body)?).await
    }

    /// Patch the store identified by `body.id`.
    pub async fn update_store(&self, cancel: &CancellationToken, body: &Store) -> Result<Store, ApiError> {
        require_id("store", "id", &body.id)?;
        self.fetch(cancel, Request::patch(store_path(&body.id)).json(body)?).await
    }

    pub async fn delete_store(&self, cancel: &CancellationToken, id: &str) -> Result<bool, ApiError> {
        require_id("store", "id", id)?;
        self.execute_ok(cancel, HttpMethod::Delete, store_path(id)).await
    }
}

impl Store {
    fn can_make_request(&self) -> Result<&Client, ApiError> {
        require_id("store", "id", &self.id)?;
        attached(&self.client, "store")
    }

    pub async fn delete(&self, cancel: &CancellationToken) -> Result<bool, ApiError> {
        self.can_make_request()?.delete_store(cancel, &self.id).await
    }

    async fn list_children<T>(
        &self,
        cancel: &CancellationToken,
        collection: &str,
        params: Option<&ExtendedQueryParams>,
    ) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned + Resource + Default,
    {
        let client = self.can_make_request()?;
        let request = Request::get(store_child_path(&self.id, collection))
            .query(params)
            .parent(ParentKeys::store(&self.id));
        client.fetch(cancel, request).await
    }

    async fn get_child<T>(
        &self,
        cancel: &CancellationToken,
        collection: &str,
        id: &str,
        params: Option<&BasicQueryParams>,
    ) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned + Resource + Default,
    {
        let client = self.can_make_request()?;
        require_id(collection, "id", id)?;
        let request = Request::get(store_item_path(&self.id, collection, id))
            .query(params)
            .parent(ParentKeys::store(&self.id));
        client.fetch(cancel, request).await
    }

    async fn create_child<T, B>(&self, cancel: &CancellationToken, collection: &str, body: &B) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned + Resource + Default,
        B: Serialize,
    {
        let client = self.can_make_request()?;
        let request = Request::post(store_child_path(&self.id, collection))
            .json(body)?
            .parent(ParentKeys::store(&self.id));
        client.fetch(cancel, request).await
    }

    async fn update_child<T, B>(
        &self,
        cancel: &CancellationToken,
        collection: &str,
        id: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned + Resource + Default,
        B: Serialize,
    {
        let client = self.can_make_request()?;
        require_id(collection, "id", id)?;
        let request = Request::patch(store_item_path(&self.id, collection, id))
            .json(body)?
            .parent(ParentKeys::store(&self.id));
        client.fetch(cancel, request).await
    }

    async fn delete_child(&self, cancel: &CancellationToken, collection: &str, id: &str) -> Result<bool, ApiError> {
        let client = self.can_make_request()?;
        require_id(collection, "id", id)?;
        client
            .execute_ok(cancel, HttpMethod::Delete, store_item_path(&self.id, collection, id))
            .await
    }
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email_address: String,
    pub opt_in_status: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub company: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(skip_serializing)]
    pub orders_count: i64,
    #[serde(skip_serializing)]
    pub total_spent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing)]
    pub created_at: String,
    #[serde(skip_serializing)]
    pub updated_at: String,
    #[serde(rename = "_links", skip_serializing)]
    pub links: Vec<Link>,
}

impl Resource for Customer {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomerList {
    pub customers: Vec<Customer>,
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
}

impl Resource for CustomerList {}

impl Store {
    pub async fn customers(
        &self,
        cancel: &CancellationToken,
        params: Option<&ExtendedQueryParams>,
    ) -> Result<CustomerList, ApiError> {
        self.list_children(cancel, "customers", params).await
    }

    pub async fn customer(
        &self,
        cancel: &CancellationToken,
        id: &str,
        params: Option<&BasicQueryParams>,
    ) -> Result<Customer, ApiError> {
        self.get_child(cancel, "customers", id, params).await
    }

    pub async fn create_customer(&self, cancel: &CancellationToken, body: &Customer) -> Result<Customer, ApiError> {
        self.create_child(cancel, "customers", body).await
    }

    pub async fn update_customer(&self, cancel: &CancellationToken, body: &Customer) -> Result<Customer, ApiError> {
        self.update_child(cancel, "customers", &body.id, body).await
    }

    pub async fn delete_customer(&self, cancel: &CancellationToken, id: &str) -> Result<bool, ApiError> {
        self.delete_child(cancel, "customers", id).await
    }
}

// ---------------------------------------------------------------------------
// Carts and orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    pub id: String,
    pub product_id: String,
    pub product_variant_id: String,
    pub quantity: i64,
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cart {
    pub customer: Customer,
    pub currency_code: String,
    pub order_total: f64,
    pub lines: Vec<LineItem>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub campaign_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub checkout_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_total: Option<f64>,

    #[serde(skip_serializing)]
    pub created_at: String,
    #[serde(skip_serializing)]
    pub updated_at: String,
    #[serde(rename = "_links", skip_serializing)]
    pub links: Vec<Link>,
}

impl Resource for Cart {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CartList {
    pub carts: Vec<Cart>,
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
}

impl Resource for CartList {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    pub id: String,
    pub customer: Customer,
    pub lines: Vec<LineItem>,
    pub currency_code: String,
    pub order_total: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_total: Option<f64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tracking_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub processed_at_foreign: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cancelled_at_foreign: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub updated_at_foreign: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub campaign_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub financial_status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fulfillment_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,

    #[serde(skip_serializing)]
    pub created_at: String,
    #[serde(skip_serializing)]
    pub updated_at: String,
    #[serde(rename = "_links", skip_serializing)]
    pub links: Vec<Link>,
}

impl Resource for Order {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderList {
    pub orders: Vec<Order>,
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
}

impl Resource for OrderList {}

impl Store {
    pub async fn carts(
        &self,
        cancel: &CancellationToken,
        params: Option<&ExtendedQueryParams>,
    ) -> Result<CartList, ApiError> {
        self.list_children(cancel, "carts", params).await
    }

    pub async fn cart(
        &self,
        cancel: &CancellationToken,
        id: &str,
        params: Option<&BasicQueryParams>,
    ) -> Result<Cart, ApiError> {
        self.get_child(cancel, "carts", id, params).await
    }

    pub async fn create_cart(&self, cancel: &CancellationToken, body: &Cart) -> Result<Cart, ApiError> {
        self.create_child(cancel, "carts", body).await
    }

    pub async fn update_cart(&self, cancel: &CancellationToken, body: &Cart) -> Result<Cart, ApiError> {
        self.update_child(cancel, "carts", &body.id, body).await
    }

    pub async fn delete_cart(&self, cancel: &CancellationToken, id: &str) -> Result<bool, ApiError> {
        self.delete_child(cancel, "carts", id).await
    }

    pub async fn orders(
        &self,
        cancel: &CancellationToken,
        params: Option<&ExtendedQueryParams>,
    ) -> Result<OrderList, ApiError> {
        self.list_children(cancel, "orders", params).await
    }

    pub async fn order(
        &self,
        cancel: &CancellationToken,
        id: &str,
        params: Option<&BasicQueryParams>,
    ) -> Result<Order, ApiError> {
        self.get_child(cancel, "orders", id, params).await
    }

    pub async fn create_order(&self, cancel: &CancellationToken, body: &Order) -> Result<Order, ApiError> {
        self.create_child(cancel, "orders", body).await
    }

    pub async fn update_order(&self, cancel: &CancellationToken, body: &Order) -> Result<Order, ApiError> {
        self.update_child(cancel, "orders", &body.id, body).await
    }

    pub async fn delete_order(&self, cancel: &CancellationToken, id: &str) -> Result<bool, ApiError> {
        self.delete_child(cancel, "orders", id).await
    }
}

// ---------------------------------------------------------------------------
// Products and variants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub variants: Vec<Variant>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub handle: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub product_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub vendor: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub published_at_foreign: String,

    #[serde(rename = "_links", skip_serializing)]
    pub links: Vec<Link>,

    #[serde(skip)]
    store_id: String,
    #[serde(skip)]
    client: Option<Client>,
}

impl Resource for Product {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        self.client = Some(client.clone());
        self.store_id = parent.store_id.clone();
        let keys = ParentKeys::product(&self.store_id, &self.id);
        self.variants.attach(client, &keys);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductList {
    pub store_id: String,
    pub products: Vec<Product>,
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
}

impl Resource for ProductList {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        self.products.attach(client, parent);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Variant {
    pub id: String,
    pub title: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_quantity: Option<i64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub backorders: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub visibility: String,

    #[serde(skip)]
    store_id: String,
    #[serde(skip)]
    product_id: String,
    #[serde(skip)]
    client: Option<Client>,
}

impl Resource for Variant {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        self.client = Some(client.clone());
        self.store_id = parent.store_id.clone();
        self.product_id = parent.product_id.clone();
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VariantList {
    pub store_id: String,
    pub product_id: String,
    pub variants: Vec<Variant>,
    pub total_items: i64,
    #[serde(rename = "_links")]
    pub links: Vec<Link>,
}

impl Resource for VariantList {
    fn attach(&mut self, client: &Client, parent: &ParentKeys) {
        self.variants.attach(client, parent);
    }
}

impl Store {
    pub async fn products(
        &self,
        cancel: &CancellationToken,
        params: Option<&ExtendedQueryParams>,
    ) -> Result<ProductList, ApiError> {
        self.list_children(cancel, "products", params).await
    }

    pub async fn product(
        &self,
        cancel: &CancellationToken,
        id: &str,
        params: Option<&BasicQueryParams>,
    ) -> Result<Product, ApiError> {
        self.get_child(cancel, "products", id, params).await
    }

    pub async fn create_product(&self, cancel: &CancellationToken, body: &Product) -> Result<Product, ApiError> {
        self.create_child(cancel, "products", body).await
    }

    pub async fn update_product(&self, cancel: &CancellationToken, body: &Product) -> Result<Product, ApiError> {
        self.update_child(cancel, "products", &body.id, body).await
    }

    pub async fn delete_product(&self, cancel: &CancellationToken, id: &str) -> Result<bool, ApiError> {
        self.delete_child(cancel, "products", id).await
    }
}

impl Product {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), ..Default::default() }
    }

    /// Id of the store this product was fetched from. Empty until decoded
    /// by a store-scoped call.
    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    /// Both the product id and the owning store id are known.
    pub fn has_id(&self) -> Result<(), ApiError> {
        require_id("product", "id", &self.id)?;
        require_id("product", "store_id", &self.store_id)
    }

    fn can_make_request(&self) -> Result<&Client, ApiError> {
        self.has_id()?;
        attached(&self.client, "product")
    }

    fn keys(&self) -> ParentKeys {
        ParentKeys::product(&self.store_id, &self.id)
    }

    pub async fn delete(&self, cancel: &CancellationToken) -> Result<bool, ApiError> {
        self.can_make_request()?
            .execute_ok(cancel, HttpMethod::Delete, store_item_path(&self.store_id, "products", &self.id))
            .await
    }

    pub async fn variants(
        &self,
        cancel: &CancellationToken,
        params: Option<&ExtendedQueryParams>,
    ) -> Result<VariantList, ApiError> {
        let client = self.can_make_request()?;
        let request = Request::get(variants_path(&self.store_id, &self.id))
            .query(params)
            .parent(self.keys());
        client.fetch(cancel, request).await
    }

    pub async fn variant(
        &self,
        cancel: &CancellationToken,
        id: &str,
        params: Option<&BasicQueryParams>,
    ) -> Result<Variant, ApiError> {
        let client = self.can_make_request()?;
        require_id("variant", "id", id)?;
        let request = Request::get(variant_path(&self.store_id, &self.id, id))
            .query(params)
            .parent(self.keys());
        client.fetch(cancel, request).await
    }

    pub async fn create_variant(&self, cancel: &CancellationToken, body: &Variant) -> Result<Variant, ApiError> {
        let client = self.can_make_request()?;
        let request = Request::post(variants_path(&self.store_id, &self.id))
            .json(body)?
            .parent(self.keys());
        client.fetch(cancel, request).await
    }

    pub async fn update_variant(&self, cancel: &CancellationToken, body: &Variant) -> Result<Variant, ApiError> {
        let client = self.can_make_request()?;
        require_id("variant", "id", &body.id)?;
        let request = Request::patch(variant_path(&self.store_id, &self.id, &body.id))
            .json(body)?
            .parent(self.keys());
        client.fetch(cancel, request).await
    }

    pub async fn delete_variant(&self, cancel: &CancellationToken, id: &str) -> Result<bool, ApiError> {
        let client = self.can_make_request()?;
        require_id("variant", "id", id)?;
        client
            .execute_ok(cancel, HttpMethod::Delete, variant_path(&self.store_id, &self.id, id))
            .await
    }
}

impl Variant {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), ..Default::default() }
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub async fn delete(&self, cancel: &CancellationToken) -> Result<bool, ApiError> {
        require_id("variant", "id", &self.id)?;
        require_id("variant", "store_id", &self.store_id)?;
        require_id("variant", "product_id", &self.product_id)?;
        attached(&self.client, "variant")?
            .execute_ok(cancel, HttpMethod::Delete, variant_path(&self.store_id, &self.product_id, &self.id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client, ENDPOINT};

    async fn store(client: &Client, transport: &crate::test_support::RecordingTransport) -> Store {
        transport.push(200, r#"{"id":"s1","list_id":"L1","currency_code":"USD","name":"Shop"}"#);
        client.get_store(&CancellationToken::new(), "s1", None).await.unwrap()
    }

    #[tokio::test]
    async fn nested_collections_use_their_own_paths() {
        let (client, transport) = client();
        let cancel = CancellationToken::new();
        let store = store(&client, &transport).await;

        transport.push(200, r#"{"orders":[{"id":"o1","order_total":9.5}],"total_items":1}"#);
        let orders = store.orders(&cancel, None).await.unwrap();
        assert_eq!(orders.orders[0].id, "o1");
        assert_eq!(transport.last().url, format!("{ENDPOINT}/ecommerce/stores/s1/orders"));

        transport.push(200, r#"{"customers":[{"id":"c1"}],"total_items":1}"#);
        let customers = store.customers(&cancel, None).await.unwrap();
        assert_eq!(customers.customers.len(), 1);
        assert_eq!(transport.last().url, format!("{ENDPOINT}/ecommerce/stores/s1/customers"));

        transport.push(200, r#"{"id":"p1","title":"Mug"}"#);
        store.product(&cancel, "p1", None).await.unwrap();
        assert_eq!(transport.last().url, format!("{ENDPOINT}/ecommerce/stores/s1/products/p1"));

        transport.push(200, r#"{"carts":[{"id":"k1"}],"total_items":1}"#);
        let carts = store.carts(&cancel, None).await.unwrap();
        assert_eq!(carts.carts[0].id, "k1");
    }

    #[tokio::test]
    async fn product_gets_store_id_and_variants_get_both_parents() {
        let (client, transport) = client();
        let cancel = CancellationToken::new();
        let store = store(&client, &transport).await;

        transport.push(
            200,
            r#"{"store_id":"s1","products":[{"id":"p1","title":"Mug","variants":[{"id":"v1","title":"Blue"}]},{"id":"p2","title":"Cup"}]}"#,
        );
        let products = store.products(&cancel, None).await.unwrap();
        assert_eq!(products.products[0].store_id(), "s1");
        assert_eq!(products.products[1].store_id(), "s1");
        assert!(products.products[0].has_id().is_ok());

        let variant = &products.products[0].variants[0];
        assert_eq!(variant.store_id(), "s1");
        assert_eq!(variant.product_id(), "p1");

        assert!(variant.delete(&cancel).await.unwrap());
        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Delete);
        assert_eq!(sent.url, format!("{ENDPOINT}/ecommerce/stores/s1/products/p1/variants/v1"));
    }

    #[tokio::test]
    async fn product_creates_and_updates_variants() {
        let (client, transport) = client();
        let cancel = CancellationToken::new();
        let store = store(&client, &transport).await;

        transport.push(200, r#"{"id":"p1","title":"Mug"}"#);
        let product = store
            .create_product(&cancel, &Product { id: "p1".to_string(), title: "Mug".to_string(), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(transport.last().method, HttpMethod::Post);
        assert_eq!(product.store_id(), "s1");

        let body = Variant { id: "v1".to_string(), title: "Red".to_string(), price: Some(4.0), ..Default::default() };
        transport.push(200, r#"{"id":"v1","title":"Red","price":4.0}"#);
        let created = product.create_variant(&cancel, &body).await.unwrap();
        assert_eq!(created.product_id(), "p1");
        assert_eq!(transport.last().url, format!("{ENDPOINT}/ecommerce/stores/s1/products/p1/variants"));
        assert_eq!(transport.last().body.as_deref(), Some(r#"{"id":"v1","title":"Red","price":4.0}"#));

        transport.push(200, r#"{"id":"v1","title":"Crimson"}"#);
        product.update_variant(&cancel, &Variant { title: "Crimson".to_string(), ..body }).await.unwrap();
        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.url, format!("{ENDPOINT}/ecommerce/stores/s1/products/p1/variants/v1"));
    }

    #[tokio::test]
    async fn unscoped_product_is_rejected_before_sending() {
        let (_client, transport) = client();
        let product = Product { id: "p1".to_string(), ..Default::default() };
        assert!(product.has_id().unwrap_err().is_validation());
        let err = product.delete_variant(&CancellationToken::new(), "v1").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn store_body_skips_response_only_fields() {
        let (client, transport) = client();
        let body = Store {
            id: "s1".to_string(),
            list_id: "L1".to_string(),
            currency_code: "USD".to_string(),
            name: "Shop".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            ..Default::default()
        };
        client.update_store(&CancellationToken::new(), &body).await.unwrap();
        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.url, format!("{ENDPOINT}/ecommerce/stores/s1"));
        assert_eq!(
            sent.body.as_deref(),
            Some(r#"{"id":"s1","list_id":"L1","currency_code":"USD","name":"Shop"}"#)
        );
    }
}
