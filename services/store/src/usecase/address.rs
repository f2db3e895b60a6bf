use chrono::Utc;
use uuid::Uuid;

use bazaar_domain::pincode;
use bazaar_domain::user::Actor;

use crate::domain::repository::AddressRepository;
use crate::domain::types::Address;
use crate::error::StoreServiceError;

const MAX_LINE_LEN: usize = 255;
const MAX_PLACE_LEN: usize = 100;
const PHONE_LEN: std::ops::RangeInclusive<usize> = 10..=15;

#[derive(Debug, Clone)]
pub struct AddressInput {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
    pub is_default: bool,
}

fn required(value: &str, field: &str, max: usize) -> Result<(), StoreServiceError> {
    if value.trim().is_empty() {
        return Err(StoreServiceError::validation(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(StoreServiceError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

impl AddressInput {
    fn validate(&self) -> Result<(), StoreServiceError> {
        required(&self.address_line1, "address_line1", MAX_LINE_LEN)?;
        if let Some(line2) = &self.address_line2 {
            if line2.chars().count() > MAX_LINE_LEN {
                return Err(StoreServiceError::validation(
                    "address_line2 must be at most 255 characters",
                ));
            }
        }
        required(&self.city, "city", MAX_PLACE_LEN)?;
        required(&self.state, "state", MAX_PLACE_LEN)?;
        if !PHONE_LEN.contains(&self.phone.chars().count()) {
            return Err(StoreServiceError::validation(
                "phone must be 10 to 15 characters",
            ));
        }
        if !pincode::is_valid(&self.pincode) {
            return Err(StoreServiceError::InvalidPincode);
        }
        Ok(())
    }

    fn into_address(self, id: Uuid, user_id: Uuid, created_at: chrono::DateTime<Utc>) -> Address {
        Address {
            id,
            user_id,
            address_line1: self.address_line1,
            address_line2: self.address_line2.filter(|line| !line.trim().is_empty()),
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            phone: self.phone,
            is_default: self.is_default,
            created_at,
        }
    }
}

// ── ListAddresses ────────────────────────────────────────────────────────────

pub struct ListAddressesUseCase<A: AddressRepository> {
    pub addresses: A,
}

impl<A: AddressRepository> ListAddressesUseCase<A> {
    pub async fn execute(&self, actor: Actor) -> Result<Vec<Address>, StoreServiceError> {
        self.addresses.list_by_user(actor.user_id).await
    }
}

// ── CreateAddress ────────────────────────────────────────────────────────────

pub struct CreateAddressUseCase<A: AddressRepository> {
    pub addresses: A,
}

impl<A: AddressRepository> CreateAddressUseCase<A> {
    pub async fn execute(
        &self,
        actor: Actor,
        input: AddressInput,
    ) -> Result<Address, StoreServiceError> {
        input.validate()?;
        let address = input.into_address(Uuid::now_v7(), actor.user_id, Utc::now());
        self.addresses.create(&address).await?;
        Ok(address)
    }
}

// ── UpdateAddress ────────────────────────────────────────────────────────────

pub struct UpdateAddressUseCase<A: AddressRepository> {
    pub addresses: A,
}

impl<A: AddressRepository> UpdateAddressUseCase<A> {
    pub async fn execute(
        &self,
        actor: Actor,
        address_id: Uuid,
        input: AddressInput,
    ) -> Result<Address, StoreServiceError> {
        let existing = self
            .addresses
            .find_by_id(address_id)
            .await?
            .ok_or(StoreServiceError::AddressNotFound)?;
        actor.ensure_owner(existing.user_id)?;
        input.validate()?;
        let address = input.into_address(existing.id, existing.user_id, existing.created_at);
        self.addresses.update(&address).await?;
        Ok(address)
    }
}

// ── DeleteAddress ────────────────────────────────────────────────────────────

pub struct DeleteAddressUseCase<A: AddressRepository> {
    pub addresses: A,
}

impl<A: AddressRepository> DeleteAddressUseCase<A> {
    pub async fn execute(&self, actor: Actor, address_id: Uuid) -> Result<(), StoreServiceError> {
        let address = self
            .addresses
            .find_by_id(address_id)
            .await?
            .ok_or(StoreServiceError::AddressNotFound)?;
        actor.ensure_owner(address.user_id)?;
        if self.addresses.is_referenced(address.id).await? {
            return Err(StoreServiceError::AddressInUse);
        }
        self.addresses.delete(address.id).await
    }
}
