// src/models/auth.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::common::validation::{is_digits, validate_not_blank, EMAIL_RE};
use crate::models::order::Order;

// --- Enums do banco ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "client_type")]
pub enum ClientType {
    #[sqlx(rename = "PF")]
    #[serde(rename = "PF")]
    Individual, // Pessoa Física (CPF)
    #[sqlx(rename = "PJ")]
    #[serde(rename = "PJ")]
    Company, // Pessoa Jurídica (CNPJ)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "client_segment")]
pub enum Segment {
    Gold,
    Silver,
    Bronze,
}

impl Segment {
    /// Segmento do cliente a partir do total gasto (limites estritos).
    pub fn for_total_spent(total_spent: Decimal) -> Self {
        if total_spent > Decimal::from(10_000) {
            Segment::Gold
        } else if total_spent > Decimal::from(5_000) {
            Segment::Silver
        } else {
            Segment::Bronze
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub client_type: ClientType,
    pub name: String,
    pub cpf: Option<String>,
    pub cnpj: Option<String>,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password: String,

    pub phone: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub role: Role,
    pub segment: Segment,
    #[schema(value_type = f64)]
    pub total_spent: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// Projeção usada na listagem de usuários do painel admin
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListEntry {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub city: String,
    pub state: String,
    pub role: Role,
    pub segment: Segment,
    #[schema(value_type = f64)]
    pub total_spent: Decimal,
}

// Dados novos de um usuário, já com a senha em hash
#[derive(Debug, Clone)]
pub struct NewUser {
    pub client_type: ClientType,
    pub name: String,
    pub cpf: Option<String>,
    pub cnpj: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub role: Role,
}

// ---
// Payloads
// ---

// Dados para registro de um novo cliente (PF ou PJ, discriminado por `clientType`)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    pub client_type: ClientType,

    #[validate(length(min = 3, message = "Nome obrigatório"))]
    pub name: String,

    pub cpf: Option<String>,
    pub cnpj: Option<String>,

    #[validate(
        length(min = 5, message = "E-mail é obrigatório"),
        regex(path = *EMAIL_RE, message = "Formato inválido")
    )]
    pub email: String,

    #[validate(length(min = 8, message = "A senha deve ter pelo menos 8 caracteres"))]
    pub password: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub phone: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub street: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub number: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub complement: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub district: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub city: String,

    #[validate(length(equal = 2, message = "O estado deve ter 2 letras"))]
    pub state: String,
}

impl RegisterUserPayload {
    /// PF exige CPF com 11 dígitos, PJ exige CNPJ com 14.
    pub fn validate_document(&self) -> Result<(), ValidationErrors> {
        let (field, value, len, message) = match self.client_type {
            ClientType::Individual => ("cpf", &self.cpf, 11, "CPF deve conter 11 dígitos numéricos"),
            ClientType::Company => ("cnpj", &self.cnpj, 14, "CNPJ deve conter 14 dígitos numéricos"),
        };

        match value {
            Some(doc) if is_digits(doc, len) => Ok(()),
            _ => {
                let mut err = ValidationError::new("regex");
                err.message = Some(message.into());
                let mut errors = ValidationErrors::new();
                errors.add(field, err);
                Err(errors)
            }
        }
    }

    /// Converte o payload num `NewUser`, descartando o documento do outro tipo.
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        let (cpf, cnpj) = match self.client_type {
            ClientType::Individual => (self.cpf, None),
            ClientType::Company => (None, self.cnpj),
        };

        NewUser {
            client_type: self.client_type,
            name: self.name,
            cpf,
            cnpj,
            email: self.email,
            password_hash,
            phone: self.phone,
            street: self.street,
            number: self.number,
            complement: self.complement,
            district: self.district,
            city: self.city,
            state: self.state,
            role: Role::User,
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "O e-mail é obrigatório."))]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Atualização parcial do próprio perfil
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(length(min = 3, message = "Nome obrigatório"))]
    pub name: Option<String>,
    #[validate(
        length(min = 5, message = "E-mail é obrigatório"),
        regex(path = *EMAIL_RE, message = "Formato inválido")
    )]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    #[validate(length(equal = 2, message = "O estado deve ter 2 letras"))]
    pub state: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRolePayload {
    pub email: String,
    pub role: String,
}

// ---
// Respostas
// ---

#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserSummary,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedUserResponse {
    pub message: String,
    pub updated_user: User,
}

// Perfil com os pedidos do usuário
#[derive(Debug, Serialize, ToSchema)]
pub struct Profile {
    #[serde(flatten)]
    pub user: User,
    pub orders: Vec<Order>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,   // Subject (ID do usuário)
    pub role: Role,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn individual_payload() -> serde_json::Value {
        json!({
            "clientType": "PF",
            "name": "Maria Silva",
            "cpf": "12345678901",
            "email": "maria@example.com",
            "password": "segredo123",
            "phone": "19999999999",
            "street": "Rua 1",
            "number": "100",
            "complement": "Casa",
            "district": "Centro",
            "city": "Rio Claro",
            "state": "SP"
        })
    }

    #[test]
    fn test_segment_thresholds_are_strict() {
        assert_eq!(Segment::for_total_spent(Decimal::ZERO), Segment::Bronze);
        assert_eq!(Segment::for_total_spent(Decimal::from(5_000)), Segment::Bronze);
        assert_eq!(Segment::for_total_spent(Decimal::new(500_001, 2)), Segment::Silver);
        assert_eq!(Segment::for_total_spent(Decimal::from(10_000)), Segment::Silver);
        assert_eq!(Segment::for_total_spent(Decimal::new(1_000_001, 2)), Segment::Gold);
    }

    #[test]
    fn test_client_type_literals() {
        assert_eq!(serde_json::to_string(&ClientType::Individual).unwrap(), "\"PF\"");
        assert_eq!(serde_json::to_string(&ClientType::Company).unwrap(), "\"PJ\"");
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn test_valid_individual_registration() {
        let payload: RegisterUserPayload = serde_json::from_value(individual_payload()).unwrap();
        assert!(payload.validate().is_ok());
        assert!(payload.validate_document().is_ok());
    }

    #[test]
    fn test_individual_requires_eleven_digit_cpf() {
        let mut value = individual_payload();
        value["cpf"] = json!("1234567890a");
        let payload: RegisterUserPayload = serde_json::from_value(value).unwrap();

        let errors = payload.validate_document().unwrap_err();
        assert!(errors.field_errors().contains_key("cpf"));
    }

    #[test]
    fn test_company_requires_cnpj() {
        let mut value = individual_payload();
        value["clientType"] = json!("PJ");
        let payload: RegisterUserPayload = serde_json::from_value(value).unwrap();

        let errors = payload.validate_document().unwrap_err();
        assert!(errors.field_errors().contains_key("cnpj"));
    }

    #[test]
    fn test_registration_field_rules() {
        let mut value = individual_payload();
        value["name"] = json!("Al");
        value["password"] = json!("curta");
        value["state"] = json!("SAO");
        value["email"] = json!("sem-arroba");
        let payload: RegisterUserPayload = serde_json::from_value(value).unwrap();

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("state"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_email_needs_dotted_domain() {
        let mut value = individual_payload();
        value["email"] = json!("maria@localhost");
        let payload: RegisterUserPayload = serde_json::from_value(value).unwrap();
        assert!(payload.validate().unwrap_err().field_errors().contains_key("email"));

        let mut value = individual_payload();
        value["email"] = json!("a@b.co");
        let payload: RegisterUserPayload = serde_json::from_value(value).unwrap();
        assert!(payload.validate().is_ok());

        let payload = UpdateProfilePayload {
            email: Some("maria@localhost".into()),
            ..Default::default()
        };
        assert!(payload.validate().unwrap_err().field_errors().contains_key("email"));
    }

    #[test]
    fn test_blank_address_fields_are_rejected() {
        let mut value = individual_payload();
        value["street"] = json!("");
        value["phone"] = json!("   ");
        let payload: RegisterUserPayload = serde_json::from_value(value).unwrap();

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("street"));
        assert!(fields.contains_key("phone"));
        assert!(!fields.contains_key("city"));
    }

    #[test]
    fn test_into_new_user_drops_other_document() {
        let mut value = individual_payload();
        value["cnpj"] = json!("12345678000199");
        let payload: RegisterUserPayload = serde_json::from_value(value).unwrap();

        let new_user = payload.into_new_user("hash".into());
        assert_eq!(new_user.cpf.as_deref(), Some("12345678901"));
        assert!(new_user.cnpj.is_none());
        assert_eq!(new_user.role, Role::User);
    }

    #[test]
    fn test_partial_profile_update_validation() {
        let payload = UpdateProfilePayload {
            state: Some("S".into()),
            ..Default::default()
        };
        assert!(payload.validate().is_err());

        let payload = UpdateProfilePayload {
            city: Some("Campinas".into()),
            ..Default::default()
        };
        assert!(payload.validate().is_ok());
    }
}
