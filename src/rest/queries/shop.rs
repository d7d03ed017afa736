//! Shop document.

pub const SHOP: &str = r"
query shop {
  shop {
    id
    name
    email
    contactEmail
    myshopifyDomain
    primaryDomain { host }
    shopOwnerName
    currencyCode
    enabledPresentmentCurrencies
    ianaTimezone
    timezoneAbbreviation
    weightUnit
    taxesIncluded
    taxShipping
    createdAt
    updatedAt
    plan { displayName partnerDevelopment shopifyPlus }
    currencyFormats { moneyFormat moneyWithCurrencyFormat }
    billingAddress {
      address1
      address2
      city
      province
      provinceCode
      country
      countryCodeV2
      zip
      phone
      latitude
      longitude
    }
  }
}
";
