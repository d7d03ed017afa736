//! Delivery profile documents (REST shipping zones).

pub const DELIVERY_ZONES: &str = r"
query deliveryZones {
  deliveryProfiles(first: 250) {
    nodes {
      id
      profileLocationGroups {
        locationGroup { id }
        locationGroupZones(first: 250) {
          nodes {
            zone {
              id
              name
              countries {
                id
                name
                code { countryCode restOfWorld }
                provinces { name code }
              }
            }
            methodDefinitions(first: 250) {
              nodes {
                id
                name
                active
                rateProvider {
                  __typename
                  ... on DeliveryRateDefinition {
                    id
                    price { amount currencyCode }
                  }
                  ... on DeliveryParticipant {
                    id
                    fixedFee { amount currencyCode }
                    percentageOfRateFee
                    carrierService { id name }
                  }
                }
                methodConditions {
                  field
                  operator
                  conditionCriteria {
                    __typename
                    ... on MoneyV2 { amount currencyCode }
                    ... on Weight { value unit }
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}
";
