// src/services/order_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{date_filter::DateRange, error::AppError},
    db::{OrderRepository, ProductRepository, TransactionRepository, UserRepository},
    models::{
        auth::{Segment, User},
        product::Product,
        order::{
            NewOrder, Order, OrderFilters, OrderWithProduct, OrderWithRelations, PlacedOrder,
            NEW_ORDER_STATUS_DETAIL,
        },
        status::Status,
        transaction::NewTransaction,
    },
};

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    product_repo: ProductRepository,
    user_repo: UserRepository,
    transaction_repo: TransactionRepository,
    pool: PgPool,
}

impl OrderService {
    pub fn new(
        order_repo: OrderRepository,
        product_repo: ProductRepository,
        user_repo: UserRepository,
        transaction_repo: TransactionRepository,
        pool: PgPool,
    ) -> Self {
        Self { order_repo, product_repo, user_repo, transaction_repo, pool }
    }

    // --- PLACE ORDER ---
    // Pedido, baixa de estoque, total gasto, segmento e snapshot numa única transação.
    pub async fn place_order(
        &self,
        user: &User,
        product_id: i32,
        quantity: i32,
    ) -> Result<PlacedOrder, AppError> {
        // Garante o 404 antes de abrir a transação
        self.product_repo
            .find_by_id(product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let mut tx = self.pool.begin().await?;

        // 1. Baixa o estoque (falha se não houver saldo)
        let product = self.product_repo
            .decrement_stock(&mut *tx, product_id, quantity)
            .await?
            .ok_or(AppError::InsufficientStock)?;

        let total_price = product.price * Decimal::from(quantity);

        // 2. Cria o pedido com o endereço do cliente
        let order = self.order_repo
            .create(
                &mut *tx,
                &NewOrder {
                    user_id: user.id,
                    product_id,
                    quantity,
                    total_price,
                    status: Status::Pending,
                    status_detail: Some(NEW_ORDER_STATUS_DETAIL.to_string()),
                    city: Some(user.city.clone()),
                    state: Some(user.state.clone()),
                },
            )
            .await?;

        // 3. Atualiza o total gasto e, se preciso, o segmento
        let updated_user = self.user_repo
            .add_total_spent(&mut *tx, user.id, total_price)
            .await?;

        let new_segment = Segment::for_total_spent(updated_user.total_spent);
        if new_segment != updated_user.segment {
            self.user_repo.set_segment(&mut *tx, user.id, new_segment).await?;
            tracing::info!(
                "🏅 Usuário {} mudou de segmento: {:?} -> {:?}",
                user.id, updated_user.segment, new_segment
            );
        }

        // 4. Grava o snapshot da venda, já com o segmento pós-pedido
        self.transaction_repo
            .create(
                &mut *tx,
                &sale_snapshot(&order, &product, &updated_user, new_segment),
            )
            .await?;

        // Se chegou aqui, deu tudo certo. "Commita" a transação.
        tx.commit().await?;

        tracing::info!("🛒 Pedido {} criado para o usuário {}", order.id, user.id);

        Ok(PlacedOrder {
            order,
            product_name: product.name,
        })
    }

    pub async fn list_orders(&self, filters: &OrderFilters) -> Result<Vec<OrderWithRelations>, AppError> {
        let range = DateRange::parse(filters.start_date.as_deref(), filters.end_date.as_deref())?;

        let rows = self.order_repo
            .list_with_relations(filters.user_id, filters.status, range)
            .await?;

        Ok(rows.into_iter().map(|row| row.into_with_relations()).collect())
    }

    // Pedidos do próprio usuário; `userId` da query é ignorado
    pub async fn list_user_orders(
        &self,
        user_id: i32,
        filters: &OrderFilters,
    ) -> Result<Vec<OrderWithProduct>, AppError> {
        let range = DateRange::parse(filters.start_date.as_deref(), filters.end_date.as_deref())?;

        let rows = self.order_repo
            .list_with_relations(Some(user_id), filters.status, range)
            .await?;

        Ok(rows.into_iter().map(|row| row.into_with_product()).collect())
    }

    pub async fn update_order_status(
        &self,
        id: i32,
        status: Option<Status>,
        status_detail: Option<&str>,
    ) -> Result<OrderWithRelations, AppError> {
        let status_detail = status_detail.filter(|d| !d.trim().is_empty());
        if status.is_none() && status_detail.is_none() {
            return Err(AppError::EmptyOrderUpdate);
        }

        self.order_repo
            .update_status(id, status, status_detail)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        let row = self.order_repo
            .find_with_relations(id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        Ok(row.into_with_relations())
    }
}

/// Cópia desnormalizada do pedido, do cliente e do produto no momento da venda.
pub fn sale_snapshot(
    order: &Order,
    product: &Product,
    customer: &User,
    segment: Segment,
) -> NewTransaction {
    NewTransaction {
        order_id: order.id,
        user_id: customer.id,
        product_id: order.product_id,
        order_date: order.created_at,
        status: order.status,
        status_detail: order.status_detail.clone(),
        city: order.city.clone(),
        state: order.state.clone(),
        client_name: customer.name.clone(),
        client_segment: segment,
        product_name: product.name.clone(),
        product_category: product.category.clone(),
        quantity: order.quantity,
        unit_price: product.price,
        total_price: order.total_price,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::{ClientType, NewUser, Role};
    use chrono::{TimeZone, Utc};

    fn customer(total_spent: Decimal, segment: Segment) -> User {
        let now = Utc.with_ymd_and_hms(2025, 5, 2, 9, 0, 0).unwrap();
        User {
            id: 3,
            client_type: ClientType::Individual,
            name: "Maria Silva".into(),
            cpf: Some("12345678901".into()),
            cnpj: None,
            email: "maria@example.com".into(),
            password: "hash".into(),
            phone: "19999999999".into(),
            street: "Rua 1".into(),
            number: "100".into(),
            complement: "Casa".into(),
            district: "Centro".into(),
            city: "Rio Claro".into(),
            state: "SP".into(),
            role: Role::User,
            segment,
            total_spent,
            created_at: now,
            updated_at: now,
        }
    }

    fn product() -> Product {
        Product {
            id: 9,
            name: "Cadeira".into(),
            category: "Móveis".into(),
            price: Decimal::from(2_000),
            stock: 4,
            image_url: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn order() -> Order {
        Order {
            id: 7,
            user_id: 3,
            product_id: 9,
            quantity: 1,
            total_price: Decimal::from(2_000),
            status: Status::Pending,
            status_detail: Some(NEW_ORDER_STATUS_DETAIL.into()),
            city: Some("Rio Claro".into()),
            state: Some("SP".into()),
            created_at: Utc.with_ymd_and_hms(2025, 5, 2, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_snapshot_carries_post_order_segment() {
        // Prata com 9.000 que passa a 11.000 depois do pedido
        let after_order = customer(Decimal::from(11_000), Segment::Silver);
        let segment = Segment::for_total_spent(after_order.total_spent);
        assert_eq!(segment, Segment::Gold);

        let snapshot = sale_snapshot(&order(), &product(), &after_order, segment);
        assert_eq!(snapshot.client_segment, Segment::Gold);
        assert_eq!(snapshot.client_name, "Maria Silva");
    }

    #[test]
    fn test_snapshot_copies_order_and_product() {
        let order = order();
        let snapshot = sale_snapshot(
            &order,
            &product(),
            &customer(Decimal::from(2_000), Segment::Bronze),
            Segment::Bronze,
        );

        assert_eq!(snapshot.order_id, 7);
        assert_eq!(snapshot.user_id, 3);
        assert_eq!(snapshot.product_id, 9);
        assert_eq!(snapshot.order_date, order.created_at);
        assert_eq!(snapshot.status, Status::Pending);
        assert_eq!(snapshot.status_detail.as_deref(), Some(NEW_ORDER_STATUS_DETAIL));
        assert_eq!(snapshot.city.as_deref(), Some("Rio Claro"));
        assert_eq!(snapshot.state.as_deref(), Some("SP"));
        assert_eq!(snapshot.product_name, "Cadeira");
        assert_eq!(snapshot.product_category, "Móveis");
        assert_eq!(snapshot.unit_price, Decimal::from(2_000));
        assert_eq!(snapshot.total_price, Decimal::from(2_000));
    }

    // Precisa de um PostgreSQL em DATABASE_URL: `cargo test -- --ignored`
    #[tokio::test]
    #[ignore = "requer PostgreSQL em DATABASE_URL"]
    async fn test_place_order_against_database() {
        use sqlx::postgres::PgPoolOptions;

        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").unwrap();
        let pool = PgPoolOptions::new().max_connections(2).connect(&url).await.unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();

        let user_repo = UserRepository::new(pool.clone());
        let product_repo = ProductRepository::new(pool.clone());
        let service = OrderService::new(
            OrderRepository::new(pool.clone()),
            product_repo.clone(),
            user_repo.clone(),
            TransactionRepository::new(pool.clone()),
            pool.clone(),
        );

        let nonce = Utc::now().timestamp_nanos_opt().unwrap().unsigned_abs();
        let user = user_repo
            .create_user(
                &pool,
                &NewUser {
                    client_type: ClientType::Individual,
                    name: "Cliente Teste".into(),
                    cpf: Some(format!("{:011}", nonce % 100_000_000_000)),
                    cnpj: None,
                    email: format!("cliente{}@teste.com", nonce),
                    password_hash: "hash".into(),
                    phone: "19999999999".into(),
                    street: "Rua 1".into(),
                    number: "1".into(),
                    complement: "-".into(),
                    district: "Centro".into(),
                    city: "Campinas".into(),
                    state: "SP".into(),
                    role: Role::User,
                },
            )
            .await
            .unwrap();
        let user = user_repo.add_total_spent(&pool, user.id, Decimal::from(9_000)).await.unwrap();
        user_repo.set_segment(&pool, user.id, Segment::Silver).await.unwrap();

        let product = product_repo
            .create("Mesa", "Móveis", Decimal::from(2_000), 2, None)
            .await
            .unwrap();

        // Sem saldo: nada muda
        let err = service.place_order(&user, product.id, 3).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock));
        let stock = product_repo.find_by_id(product.id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 2);

        // 9.000 + 2.000 promove de prata para ouro
        let placed = service.place_order(&user, product.id, 1).await.unwrap();
        assert_eq!(placed.order.total_price, Decimal::from(2_000));
        assert_eq!(placed.order.city.as_deref(), Some("Campinas"));

        let stock = product_repo.find_by_id(product.id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 1);

        let updated = user_repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(updated.total_spent, Decimal::from(11_000));
        assert_eq!(updated.segment, Segment::Gold);

        let segment: Segment = sqlx::query_scalar(
            "SELECT client_segment FROM transactions WHERE order_id = $1",
        )
        .bind(placed.order.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(segment, Segment::Gold);
    }
}
